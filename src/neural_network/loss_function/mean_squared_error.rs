use crate::ModelError;
use crate::autodiff::{Tape, Var};
use crate::math::mean_squared_error;
use crate::traits::LossFunction;
use ndarray::Array2;

/// Mean Squared Error loss function
///
/// # Example
///
/// ```rust
/// use rustylstm::neural_network::loss_function::*;
/// use rustylstm::traits::LossFunction;
/// use ndarray::array;
///
/// // Create an MSE loss function instance
/// let mse = MeanSquaredError::new();
///
/// let y_true = array![[1.0, 2.0, 3.0]];
/// let y_pred = array![[1.1, 2.2, 2.8]];
///
/// // Compute the MSE loss
/// let loss = mse.compute_loss(&y_true, &y_pred).unwrap();
/// assert!((loss - 0.03).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl MeanSquaredError {
    /// Creates a new instance of MeanSquaredError
    ///
    /// # Returns
    ///
    /// - `MeanSquaredError` - Returns a unit-like struct `MeanSquaredError`
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for MeanSquaredError {
    fn compute_loss(&self, y_true: &Array2<f32>, y_pred: &Array2<f32>) -> Result<f32, ModelError> {
        if y_true.shape() != y_pred.shape() {
            return Err(ModelError::shape_mismatch(
                "mean squared error",
                y_true.shape(),
                y_pred.shape(),
            ));
        }

        mean_squared_error(y_true, y_pred).ok_or_else(|| {
            ModelError::InputValidationError("Input tensors cannot be empty".to_string())
        })
    }

    fn record(&self, tape: &mut Tape, y_true: Var, y_pred: Var) -> Result<Var, ModelError> {
        let diff = tape.sub(y_true, y_pred)?;
        let squared = tape.square(diff);
        tape.mean(squared)
    }
}
