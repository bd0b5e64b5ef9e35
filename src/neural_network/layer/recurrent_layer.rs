use crate::autodiff::{Tape, Var};
use crate::error::ModelError;
use ndarray::Array2;

/// Gate parameters and the per-gate affine projection
pub mod gate;
/// Input validation functions for recurrent layers
mod input_validation_function;
/// The four-gate LSTM parameter set
pub mod lstm;
/// One LSTM time step (the gate block)
pub mod lstm_cell;
/// Unrolling the LSTM cell across a sequence
pub mod sequence_runner;

pub use gate::{Gate, GateKind, GateVars};
pub use lstm::{LSTMParameterVars, LSTMParameters};
pub use lstm_cell::{step, step_on_tape};
pub use sequence_runner::{TapeTrajectory, Trajectory, unroll, unroll_on_tape, zero_state};

pub(crate) use input_validation_function::{validate_sequence, validate_targets};
