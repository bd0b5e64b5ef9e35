pub use crate::ModelError;
pub use crate::autodiff::{Tape, Var};
pub use crate::dataset::{SequenceConfig, SequenceDataset, synthetic_sequence};
pub use crate::neural_network::layer::recurrent_layer::*;
pub use crate::neural_network::loss_function::*;
pub use crate::neural_network::optimizer::*;
pub use crate::neural_network::trainer::*;
pub use crate::traits::{LossFunction, Optimizer};
