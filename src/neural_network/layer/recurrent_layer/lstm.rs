use super::input_validation_function::validate_recurrent_dimensions;
use super::*;
use rand::Rng;

/// The complete parameter set of a single-layer LSTM cell.
///
/// Each of the four gates owns a weight matrix with shape
/// (input_dim + hidden_dim, hidden_dim) and a bias row with shape (1, hidden_dim).
/// Shapes are fixed at construction; training only ever overwrites values.
///
/// # Mathematical Operations
///
/// With `x = [input_t ; h_{t-1}]`:
/// 1. i_t = σ(x · W_i + b_i)  (Input gate)
/// 2. f_t = σ(x · W_f + b_f)  (Forget gate)
/// 3. u_t = tanh(x · W_u + b_u)  (Cell update)
/// 4. o_t = σ(x · W_o + b_o)  (Output gate)
/// 5. c_t = f_t ⊙ c_{t-1} + i_t ⊙ u_t
/// 6. h_t = o_t ⊙ tanh(c_t)
///
/// # Example
/// ```rust
/// use rustylstm::neural_network::LSTMParameters;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let params = LSTMParameters::with_rng(3, 4, &mut rng).unwrap();
///
/// assert_eq!(params.input_dim(), 3);
/// assert_eq!(params.hidden_dim(), 4);
/// assert_eq!(params.param_count(), 4 * ((3 + 4) * 4 + 4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LSTMParameters {
    input_dim: usize,
    hidden_dim: usize,
    input_gate: Gate,
    forget_gate: Gate,
    cell_update_gate: Gate,
    output_gate: Gate,
}

impl LSTMParameters {
    /// Creates a parameter set with N(0, 1) weights from the thread-local RNG and zero biases
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `hidden_dim` is 0
    pub fn new(input_dim: usize, hidden_dim: usize) -> Result<Self, ModelError> {
        Self::with_rng(input_dim, hidden_dim, &mut rand::rng())
    }

    /// Creates a parameter set with N(0, 1) weights drawn from `rng` and zero biases.
    ///
    /// Gates are initialized in the order input, forget, cell update, output, so a
    /// seeded `rng` always yields the same parameters.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `hidden_dim` is 0
    pub fn with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, hidden_dim)?;
        Ok(Self {
            input_dim,
            hidden_dim,
            input_gate: Gate::with_rng(input_dim, hidden_dim, rng)?,
            forget_gate: Gate::with_rng(input_dim, hidden_dim, rng)?,
            cell_update_gate: Gate::with_rng(input_dim, hidden_dim, rng)?,
            output_gate: Gate::with_rng(input_dim, hidden_dim, rng)?,
        })
    }

    /// Creates a parameter set where every weight and bias is zero
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `hidden_dim` is 0
    pub fn zeros(input_dim: usize, hidden_dim: usize) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, hidden_dim)?;
        Ok(Self {
            input_dim,
            hidden_dim,
            input_gate: Gate::zeros(input_dim, hidden_dim)?,
            forget_gate: Gate::zeros(input_dim, hidden_dim)?,
            cell_update_gate: Gate::zeros(input_dim, hidden_dim)?,
            output_gate: Gate::zeros(input_dim, hidden_dim)?,
        })
    }

    /// Assembles a parameter set from four gates.
    ///
    /// The hidden dimension is taken from the input gate and the input dimension is
    /// the remainder of its weight rows.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the gate leaves no room for input features
    /// - `ModelError::ShapeMismatch` - If the other gates disagree with the input gate
    pub fn from_gates(
        input_gate: Gate,
        forget_gate: Gate,
        cell_update_gate: Gate,
        output_gate: Gate,
    ) -> Result<Self, ModelError> {
        let hidden_dim = input_gate.hidden_dim();
        let width = input_gate.input_width();
        if width <= hidden_dim {
            return Err(ModelError::InputValidationError(format!(
                "gate weight has {} rows, which leaves no input features for hidden_dim {}",
                width, hidden_dim
            )));
        }

        for (kind, gate) in [
            (GateKind::Forget, &forget_gate),
            (GateKind::CellUpdate, &cell_update_gate),
            (GateKind::Output, &output_gate),
        ] {
            if gate.weight.dim() != (width, hidden_dim) {
                return Err(ModelError::shape_mismatch(
                    &format!("{} gate weight", kind.name()),
                    &[width, hidden_dim],
                    gate.weight.shape(),
                ));
            }
        }

        Ok(Self {
            input_dim: width - hidden_dim,
            hidden_dim,
            input_gate,
            forget_gate,
            cell_update_gate,
            output_gate,
        })
    }

    /// Number of input features per time step
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of hidden units shared by all four gates
    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Total number of trainable scalars
    pub fn param_count(&self) -> usize {
        4 * ((self.input_dim + self.hidden_dim) * self.hidden_dim + self.hidden_dim)
    }

    /// Returns the parameters of one gate
    pub fn gate(&self, kind: GateKind) -> &Gate {
        match kind {
            GateKind::Input => &self.input_gate,
            GateKind::Forget => &self.forget_gate,
            GateKind::CellUpdate => &self.cell_update_gate,
            GateKind::Output => &self.output_gate,
        }
    }

    /// All eight parameter tensors: weight then bias for the input, forget,
    /// cell update and output gates
    pub fn tensors(&self) -> [&Array2<f32>; 8] {
        [
            &self.input_gate.weight,
            &self.input_gate.bias,
            &self.forget_gate.weight,
            &self.forget_gate.bias,
            &self.cell_update_gate.weight,
            &self.cell_update_gate.bias,
            &self.output_gate.weight,
            &self.output_gate.bias,
        ]
    }

    /// Mutable access to the eight parameter tensors, in the order of [`Self::tensors`]
    pub fn tensors_mut(&mut self) -> [&mut Array2<f32>; 8] {
        [
            &mut self.input_gate.weight,
            &mut self.input_gate.bias,
            &mut self.forget_gate.weight,
            &mut self.forget_gate.bias,
            &mut self.cell_update_gate.weight,
            &mut self.cell_update_gate.bias,
            &mut self.output_gate.weight,
            &mut self.output_gate.bias,
        ]
    }

    /// Records every parameter tensor as a leaf on `tape`
    pub fn record(&self, tape: &mut Tape) -> LSTMParameterVars {
        LSTMParameterVars {
            input: self.input_gate.record(tape),
            forget: self.forget_gate.record(tape),
            cell_update: self.cell_update_gate.record(tape),
            output: self.output_gate.record(tape),
        }
    }
}

/// Tape handles of a recorded [`LSTMParameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LSTMParameterVars {
    pub input: GateVars,
    pub forget: GateVars,
    pub cell_update: GateVars,
    pub output: GateVars,
}

impl LSTMParameterVars {
    /// Handles in the order of [`LSTMParameters::tensors`]
    pub fn leaves(&self) -> [Var; 8] {
        [
            self.input.weight,
            self.input.bias,
            self.forget.weight,
            self.forget.bias,
            self.cell_update.weight,
            self.cell_update.bias,
            self.output.weight,
            self.output.bias,
        ]
    }
}
