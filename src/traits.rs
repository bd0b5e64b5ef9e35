use crate::ModelError;
use crate::autodiff::{Tape, Var};
use ndarray::Array2;

/// Defines the interface for loss functions used in LSTM training.
///
/// A loss function can be evaluated directly on arrays, or recorded on a
/// gradient tape so its gradient reaches the parameters that produced `y_pred`.
pub trait LossFunction {
    /// Computes the loss between true and predicted values.
    ///
    /// # Parameters
    ///
    /// - `y_true` - Ground truth values
    /// - `y_pred` - Predicted values
    ///
    /// # Returns
    ///
    /// * `Result<f32, ModelError>` - The scalar loss value
    fn compute_loss(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<f32, ModelError>;

    /// Records the loss on `tape` and returns the handle of the `(1, 1)` result.
    ///
    /// # Parameters
    ///
    /// - `tape` - Tape the operations are recorded on
    /// - `y_true` - Handle of the ground truth values
    /// - `y_pred` - Handle of the predicted values
    fn record(&self, tape: &mut Tape, y_true: Var, y_pred: Var) -> Result<Var, ModelError>;
}

/// Defines the interface for optimization algorithms.
///
/// An optimizer receives one gradient per parameter tensor and overwrites the
/// parameters with their updated values. Any per-parameter state it keeps is
/// matched to parameters by position, so callers must pass them in the same
/// order on every call.
pub trait Optimizer {
    /// Applies one update step.
    ///
    /// # Parameters
    ///
    /// - `gradients` - Gradient of the loss for each parameter, same shapes as `params`
    /// - `params` - Parameters to update in place
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the counts disagree
    /// - `ModelError::ShapeMismatch` - If a gradient and its parameter differ in shape
    ///
    /// On error no parameter has been modified.
    fn apply(
        &mut self,
        gradients: &[Array2<f32>],
        params: &mut [&mut Array2<f32>],
    ) -> Result<(), ModelError>;

    /// The learning rate currently in use
    fn learning_rate(&self) -> f32;
}
