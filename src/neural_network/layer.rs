/// Recurrent layers: the LSTM parameter set, its time step and its unroll
pub mod recurrent_layer;

pub use recurrent_layer::*;
