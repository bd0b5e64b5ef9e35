use super::input_validation_function::*;
use crate::error::ModelError;
use crate::traits::Optimizer;
use ndarray::Array2;

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// A simple optimization algorithm that updates parameters in the direction
/// of the negative gradient, scaled by the learning rate.
///
/// # Fields
///
/// * `learning_rate` - Learning rate controlling the size of parameter updates
#[derive(Debug, Clone)]
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for parameter updates
    ///
    /// # Returns
    ///
    /// * `Result<Self, ModelError>` - A new SGD optimizer instance
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `learning_rate` is not positive and finite
    pub fn new(learning_rate: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }
}

impl Optimizer for SGD {
    fn apply(
        &mut self,
        gradients: &[Array2<f32>],
        params: &mut [&mut Array2<f32>],
    ) -> Result<(), ModelError> {
        validate_gradients(gradients, params)?;

        for (param, grad) in params.iter_mut().zip(gradients.iter()) {
            param.scaled_add(-self.learning_rate, grad);
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
