/// This module builds random example sequences for the LSTM cell
pub mod synthetic;

pub use synthetic::*;
