use crate::error::ModelError;
use crate::math::{sigmoid, tanh};
use ndarray::{Array2, Axis, concatenate};

/// Handle to a value recorded on a [`Tape`].
///
/// A `Var` is only meaningful for the tape that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var(pub(crate) usize);

impl Var {
    /// Position of the variable on its tape
    pub fn index(self) -> usize {
        self.0
    }
}

/// Operation that produced a node, with the handles of its inputs.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Op {
    Leaf,
    MatMul(Var, Var),
    /// Element-wise sum; the right operand may be a single row broadcast over the rows of the left.
    Add(Var, Var),
    Sub(Var, Var),
    Mul(Var, Var),
    Scale(Var, f32),
    Sigmoid(Var),
    Tanh(Var),
    ConcatColumns(Var, Var),
    Square(Var),
    Mean(Var),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) value: Array2<f32>,
    pub(crate) op: Op,
}

/// Reverse-mode differentiation tape over `Array2<f32>` values.
///
/// Every operation is evaluated eagerly and appended to the tape together with
/// the handles of its inputs. [`Tape::gradients`] then replays the tape in
/// reverse to obtain the gradient of a scalar with respect to any leaf.
///
/// # Example
/// ```rust
/// use rustylstm::autodiff::Tape;
/// use ndarray::array;
///
/// let mut tape = Tape::new();
/// let w = tape.leaf(array![[2.0]]);
/// let x = tape.leaf(array![[3.0]]);
/// let y = tape.mul(w, x).unwrap();
/// let loss = tape.square(y);
///
/// // d(w*x)^2/dw = 2 * w * x * x = 36
/// let grads = tape.gradients(loss, &[w]).unwrap();
/// assert!((grads[0][[0, 0]] - 36.0).abs() < 1e-4);
/// ```
#[derive(Debug, Default)]
pub struct Tape {
    pub(crate) nodes: Vec<Node>,
}

impl Tape {
    /// Creates an empty tape
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of recorded nodes, leaves included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every recorded node. Handles issued before the call become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Records an input value that gradients can be requested for
    pub fn leaf(&mut self, value: Array2<f32>) -> Var {
        self.push(value, Op::Leaf)
    }

    /// Value computed for `var`
    ///
    /// # Panics
    ///
    /// - If `var` was not issued by this tape
    pub fn value(&self, var: Var) -> &Array2<f32> {
        &self.nodes[var.0].value
    }

    /// Shape of the value computed for `var`
    pub fn shape(&self, var: Var) -> &[usize] {
        self.nodes[var.0].value.shape()
    }

    /// Reads a `(1, 1)` value as a scalar
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the value is not `(1, 1)`
    pub fn scalar(&self, var: Var) -> Result<f32, ModelError> {
        let value = self.value(var);
        if value.dim() != (1, 1) {
            return Err(ModelError::shape_mismatch("scalar", &[1, 1], value.shape()));
        }
        Ok(value[[0, 0]])
    }

    fn push(&mut self, value: Array2<f32>, op: Op) -> Var {
        let var = Var(self.nodes.len());
        self.nodes.push(Node { value, op });
        var
    }

    /// Matrix product `a · b`
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the column count of `a` differs from the row count of `b`
    pub fn matmul(&mut self, a: Var, b: Var) -> Result<Var, ModelError> {
        let (_, inner) = self.value(a).dim();
        let (rows_b, cols_b) = self.value(b).dim();
        if inner != rows_b {
            return Err(ModelError::shape_mismatch(
                "matmul",
                &[inner, cols_b],
                &[rows_b, cols_b],
            ));
        }
        let value = self.value(a).dot(self.value(b));
        Ok(self.push(value, Op::MatMul(a, b)))
    }

    /// Element-wise sum. `b` may also be a `(1, n)` row added to every row of `a`.
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the shapes are neither equal nor row-broadcastable
    pub fn add(&mut self, a: Var, b: Var) -> Result<Var, ModelError> {
        let (rows_a, cols_a) = self.value(a).dim();
        let (rows_b, cols_b) = self.value(b).dim();
        if cols_a != cols_b || (rows_b != rows_a && rows_b != 1) {
            return Err(ModelError::shape_mismatch(
                "add",
                &[rows_a, cols_a],
                &[rows_b, cols_b],
            ));
        }
        let value = self.value(a) + self.value(b);
        Ok(self.push(value, Op::Add(a, b)))
    }

    /// Element-wise difference `a - b`
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the shapes differ
    pub fn sub(&mut self, a: Var, b: Var) -> Result<Var, ModelError> {
        self.check_same_shape("sub", a, b)?;
        let value = self.value(a) - self.value(b);
        Ok(self.push(value, Op::Sub(a, b)))
    }

    /// Element-wise (Hadamard) product
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the shapes differ
    pub fn mul(&mut self, a: Var, b: Var) -> Result<Var, ModelError> {
        self.check_same_shape("mul", a, b)?;
        let value = self.value(a) * self.value(b);
        Ok(self.push(value, Op::Mul(a, b)))
    }

    /// Multiplies every element by a constant
    pub fn scale(&mut self, a: Var, factor: f32) -> Var {
        let value = self.value(a) * factor;
        self.push(value, Op::Scale(a, factor))
    }

    /// Element-wise logistic sigmoid
    pub fn sigmoid(&mut self, a: Var) -> Var {
        let value = self.value(a).mapv(sigmoid);
        self.push(value, Op::Sigmoid(a))
    }

    /// Element-wise hyperbolic tangent
    pub fn tanh(&mut self, a: Var) -> Var {
        let value = self.value(a).mapv(tanh);
        self.push(value, Op::Tanh(a))
    }

    /// Concatenates `a` and `b` along the feature (column) axis
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the row counts differ
    pub fn concat_columns(&mut self, a: Var, b: Var) -> Result<Var, ModelError> {
        let (rows_a, cols_a) = self.value(a).dim();
        let (rows_b, cols_b) = self.value(b).dim();
        if rows_a != rows_b {
            return Err(ModelError::shape_mismatch(
                "concat_columns",
                &[rows_a, cols_b],
                &[rows_b, cols_b],
            ));
        }
        let value = concatenate(Axis(1), &[self.value(a).view(), self.value(b).view()])
            .map_err(|e| ModelError::ProcessingError(format!("concat_columns: {}", e)))?;
        debug_assert_eq!(value.ncols(), cols_a + cols_b);
        Ok(self.push(value, Op::ConcatColumns(a, b)))
    }

    /// Element-wise square
    pub fn square(&mut self, a: Var) -> Var {
        let value = self.value(a).mapv(|x| x * x);
        self.push(value, Op::Square(a))
    }

    /// Mean over all elements, recorded as a `(1, 1)` value
    ///
    /// # Errors
    ///
    /// - `ModelError::ProcessingError` - If `a` has no elements
    pub fn mean(&mut self, a: Var) -> Result<Var, ModelError> {
        let mean = self
            .value(a)
            .mean()
            .ok_or_else(|| ModelError::ProcessingError("mean of an empty tensor".to_string()))?;
        Ok(self.push(Array2::from_elem((1, 1), mean), Op::Mean(a)))
    }

    fn check_same_shape(&self, context: &str, a: Var, b: Var) -> Result<(), ModelError> {
        let shape_a = self.shape(a);
        let shape_b = self.shape(b);
        if shape_a != shape_b {
            return Err(ModelError::shape_mismatch(context, shape_a, shape_b));
        }
        Ok(())
    }
}
