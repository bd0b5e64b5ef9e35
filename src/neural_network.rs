/// Module that contains recurrent layer implementations
pub mod layer;
/// Module that contains loss function implementations
pub mod loss_function;
/// Module that contains optimization algorithms for LSTM training
pub mod optimizer;
/// Module that contains the epoch loop fitting LSTM parameters to targets
pub mod trainer;

pub use layer::*;
pub use loss_function::*;
pub use optimizer::*;
pub use trainer::*;

pub use crate::traits::LossFunction;
pub use crate::traits::Optimizer;
