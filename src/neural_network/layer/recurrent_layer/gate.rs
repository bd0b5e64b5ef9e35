use super::input_validation_function::validate_recurrent_dimensions;
use super::*;
use rand::Rng;
use rand_distr::StandardNormal;

/// Names of the four LSTM gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Input,
    Forget,
    CellUpdate,
    Output,
}

impl GateKind {
    /// All gates, in parameter order
    pub const ALL: [GateKind; 4] = [
        GateKind::Input,
        GateKind::Forget,
        GateKind::CellUpdate,
        GateKind::Output,
    ];

    /// Lower-case gate name as used in error messages and logs
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Input => "input",
            GateKind::Forget => "forget",
            GateKind::CellUpdate => "cell_update",
            GateKind::Output => "output",
        }
    }
}

/// Parameters of a single LSTM gate.
///
/// The gate reads the concatenation `[input_t ; h_prev]`, so a single weight
/// matrix covers both the input and the recurrent connections.
///
/// # Fields
///
/// - `weight` - Weight matrix with shape (input_dim + hidden_dim, hidden_dim)
/// - `bias` - Bias row with shape (1, hidden_dim)
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub(crate) weight: Array2<f32>,
    pub(crate) bias: Array2<f32>,
}

impl Gate {
    /// Creates a gate from explicit weights.
    ///
    /// # Parameters
    ///
    /// - `weight` - Weight matrix with shape (input_dim + hidden_dim, hidden_dim)
    /// - `bias` - Bias row with shape (1, hidden_dim)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If either matrix has a zero dimension
    /// - `ModelError::ShapeMismatch` - If `bias` is not `(1, weight.ncols())`
    pub fn new(weight: Array2<f32>, bias: Array2<f32>) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(weight.nrows(), weight.ncols())?;
        if bias.dim() != (1, weight.ncols()) {
            return Err(ModelError::shape_mismatch(
                "gate bias",
                &[1, weight.ncols()],
                bias.shape(),
            ));
        }
        Ok(Self { weight, bias })
    }

    /// Creates a gate whose weights and bias are all zero.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `hidden_dim` is 0
    pub fn zeros(input_dim: usize, hidden_dim: usize) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, hidden_dim)?;
        Ok(Self {
            weight: Array2::zeros((input_dim + hidden_dim, hidden_dim)),
            bias: Array2::zeros((1, hidden_dim)),
        })
    }

    /// Creates a gate with weights drawn from N(0, 1) and a zero bias.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Dimensionality of the input features
    /// - `hidden_dim` - Number of units in the gate
    /// - `rng` - Random source used for the weights
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
        let weight = Array2::from_shape_simple_fn((input_dim + hidden_dim, hidden_dim), || {
            rng.sample::<f32, _>(StandardNormal)
        });
        Ok(Self {
            weight,
            bias: Array2::zeros((1, hidden_dim)),
        })
    }

    /// Weight matrix with shape (input_dim + hidden_dim, hidden_dim)
    pub fn weight(&self) -> &Array2<f32> {
        &self.weight
    }

    /// Bias row with shape (1, hidden_dim)
    pub fn bias(&self) -> &Array2<f32> {
        &self.bias
    }

    /// Width of the concatenated `[input_t ; h_prev]` vector this gate reads
    pub fn input_width(&self) -> usize {
        self.weight.nrows()
    }

    /// Number of units produced by this gate
    pub fn hidden_dim(&self) -> usize {
        self.weight.ncols()
    }

    /// Records the gate parameters as tape leaves
    pub fn record(&self, tape: &mut Tape) -> GateVars {
        GateVars {
            weight: tape.leaf(self.weight.clone()),
            bias: tape.leaf(self.bias.clone()),
        }
    }
}

/// Tape handles for one gate's weight and bias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVars {
    pub weight: Var,
    pub bias: Var,
}

/// Computes the pre-activation gate value: x · weight + bias
///
/// # Parameters
///
/// - `tape` - Tape the operations are recorded on
/// - `x` - Concatenated input `[input_t ; h_prev]` with shape (batch, input_dim + hidden_dim)
/// - `gate` - Tape handles of the gate parameters
///
/// # Returns
///
/// - `Result<Var, ModelError>` - Pre-activation values with shape (batch, hidden_dim)
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If `x` does not have `weight.nrows()` columns
#[inline]
pub fn compute_gate_value(tape: &mut Tape, x: Var, gate: GateVars) -> Result<Var, ModelError> {
    let projected = tape.matmul(x, gate.weight)?;
    tape.add(projected, gate.bias)
}
