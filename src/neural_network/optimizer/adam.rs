use super::input_validation_function::*;
use crate::error::ModelError;
use crate::traits::Optimizer;
use ndarray::Array2;

/// Adam optimizer implementation.
///
/// An optimization algorithm that computes individual adaptive learning
/// rates for different parameters from estimates of first and second moments
/// of the gradients. Moment estimates are kept per parameter tensor and persist
/// across calls to [`Optimizer::apply`].
///
/// # Example
/// ```rust
/// use rustylstm::neural_network::optimizer::Adam;
/// use rustylstm::traits::Optimizer;
/// use ndarray::array;
///
/// let mut adam = Adam::new(0.001, 0.9, 0.999, 1e-8).unwrap();
/// let mut weight = array![[1.0, -1.0]];
/// let grad = array![[0.5, -0.5]];
///
/// adam.apply(&[grad], &mut [&mut weight]).unwrap();
///
/// // the first bias-corrected step moves each element by about the learning rate
/// assert!((weight[[0, 0]] - 0.999).abs() < 1e-5);
/// assert!((weight[[0, 1]] + 0.999).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct Adam {
    /// Learning rate controlling the size of parameter updates.
    learning_rate: f32,
    /// Exponential decay rate for the first moment estimates.
    beta1: f32,
    /// Exponential decay rate for the second moment estimates.
    beta2: f32,
    /// Small constant added for numerical stability.
    epsilon: f32,
    /// Current timestep, incremented with each update.
    t: u64,
    /// Moment estimates, one entry per parameter tensor.
    states: Vec<AdamStates>,
}

impl Adam {
    /// Creates a new Adam optimizer with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size for parameter updates
    /// - `beta1` - Decay rate for the first moment estimates (typically 0.9)
    /// - `beta2` - Decay rate for the second moment estimates (typically 0.999)
    /// - `epsilon` - Small constant for numerical stability (typically 1e-8)
    ///
    /// # Returns
    ///
    /// * `Result<Self, ModelError>` - A new Adam optimizer instance
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If any hyper-parameter is out of range
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        validate_decay_rate(beta1, "beta1")?;
        validate_decay_rate(beta2, "beta2")?;
        validate_epsilon(epsilon)?;

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            t: 0,
            states: Vec::new(),
        })
    }

    /// Creates an Adam optimizer with β1 = 0.9, β2 = 0.999 and ε = 1e-8
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `learning_rate` is not positive and finite
    pub fn with_learning_rate(learning_rate: f32) -> Result<Self, ModelError> {
        Self::new(learning_rate, 0.9, 0.999, 1e-8)
    }

    /// Number of updates applied so far
    pub fn timestep(&self) -> u64 {
        self.t
    }

    /// Moment estimates, one entry per parameter seen by [`Optimizer::apply`]
    pub fn states(&self) -> &[AdamStates] {
        &self.states
    }

    fn ensure_states(&mut self, params: &[&mut Array2<f32>]) -> Result<(), ModelError> {
        if self.states.is_empty() {
            self.states = params.iter().map(|p| AdamStates::new(p.dim())).collect();
            return Ok(());
        }

        if self.states.len() != params.len() {
            return Err(ModelError::InputValidationError(format!(
                "optimizer state tracks {} parameters, got {}",
                self.states.len(),
                params.len()
            )));
        }
        for (index, (state, param)) in self.states.iter().zip(params.iter()).enumerate() {
            if state.m.shape() != param.shape() {
                return Err(ModelError::shape_mismatch(
                    &format!("optimizer state of parameter {}", index),
                    state.m.shape(),
                    param.shape(),
                ));
            }
        }
        Ok(())
    }
}

impl Optimizer for Adam {
    fn apply(
        &mut self,
        gradients: &[Array2<f32>],
        params: &mut [&mut Array2<f32>],
    ) -> Result<(), ModelError> {
        validate_gradients(gradients, params)?;
        self.ensure_states(params)?;

        self.t += 1; // Increment step count with each update
        for ((state, grad), param) in self
            .states
            .iter_mut()
            .zip(gradients.iter())
            .zip(params.iter_mut())
        {
            let update = state.update_parameter(
                grad,
                self.beta1,
                self.beta2,
                self.epsilon,
                self.t,
                self.learning_rate,
            );
            **param -= &update;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

/// Stores and manages Adam optimization state for a single parameter tensor.
///
/// # Fields
///
/// - `m` - First moment vector (moving average of gradients)
/// - `v` - Second moment vector (moving average of squared gradients)
#[derive(Debug, Clone, Default)]
pub struct AdamStates {
    pub m: Array2<f32>,
    pub v: Array2<f32>,
}

impl AdamStates {
    /// Creates a new Adam state object, initialized to zero
    ///
    /// # Parameters
    ///
    /// * `dims` - Tuple containing dimensions (rows, columns) of the parameter
    pub fn new(dims: (usize, usize)) -> Self {
        Self {
            m: Array2::zeros(dims),
            v: Array2::zeros(dims),
        }
    }

    /// Updates the moment estimates and calculates the bias-corrected update
    ///
    /// # Parameters
    ///
    /// - `grad` - Gradient of the parameter
    /// - `beta1` - Exponential decay rate for first moment estimates (typically 0.9)
    /// - `beta2` - Exponential decay rate for second moment estimates (typically 0.999)
    /// - `epsilon` - Small constant added for numerical stability (typically 1e-8)
    /// - `t` - Current timestep (iteration number, starting at 1)
    /// - `lr` - Learning rate for parameter updates
    ///
    /// # Returns
    ///
    /// * `Array2<f32>` - Amount to subtract from the parameter
    pub fn update_parameter(
        &mut self,
        grad: &Array2<f32>,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
        t: u64,
        lr: f32,
    ) -> Array2<f32> {
        Self::update_adam_param(&mut self.m, &mut self.v, grad, beta1, beta2);

        // Calculate bias-corrected states
        let correction1 = 1.0 - beta1.powf(t as f32);
        let correction2 = 1.0 - beta2.powf(t as f32);
        let m_hat = self.m.mapv(|x| x / correction1);
        let v_hat = self.v.mapv(|x| x / correction2);

        lr * &m_hat / &(v_hat.mapv(f32::sqrt) + epsilon)
    }

    /// Helper function: Update Adam state variables
    ///
    /// # Effects
    ///
    /// - Updates `m` in-place with new first moment values: m = beta1*m + (1-beta1)*g
    /// - Updates `v` in-place with new second moment values: v = beta2*v + (1-beta2)*g²
    fn update_adam_param(
        m: &mut Array2<f32>,
        v: &mut Array2<f32>,
        g: &Array2<f32>,
        beta1: f32,
        beta2: f32,
    ) {
        let (m_updated, v_updated) = rayon::join(
            || m.mapv(|x| x * beta1) + &(g * (1.0 - beta1)),
            || v.mapv(|x| x * beta2) + &(g.mapv(|x| x * x) * (1.0 - beta2)),
        );

        *m = m_updated;
        *v = v_updated;
    }
}
