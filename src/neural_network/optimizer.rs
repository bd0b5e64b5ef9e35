/// Adam optimizer with per-parameter moment estimates
pub mod adam;
/// Input validation functions for optimizers
mod input_validation_function;
/// Plain stochastic gradient descent
pub mod sgd;

pub use adam::*;
pub use sgd::*;
