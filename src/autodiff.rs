/// Gradient tape recording operations on 2-D arrays
pub mod tape;

/// Reverse sweep over a recorded tape
mod backward;

pub use tape::{Tape, Var};
