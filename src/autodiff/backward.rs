use super::tape::{Op, Tape, Var};
use crate::error::ModelError;
use ndarray::{Array2, Axis, s};

impl Tape {
    /// Computes the gradient of a scalar `loss` with respect to each variable in `wrt`.
    ///
    /// The tape is swept once in reverse from `loss`; contributions reaching the same
    /// node along several paths are summed. Each returned gradient has the shape of
    /// the matching variable.
    ///
    /// # Parameters
    ///
    /// - `loss` - A `(1, 1)` variable recorded on this tape
    /// - `wrt` - Variables to differentiate with respect to, usually leaves
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Array2<f32>>)` - One gradient per entry of `wrt`, in the same order
    ///
    /// # Errors
    ///
    /// - `ModelError::ProcessingError` - If `loss` was not recorded on this tape
    /// - `ModelError::ShapeMismatch` - If `loss` is not a `(1, 1)` value
    /// - `ModelError::UnusedParameterGradient` - If some variable in `wrt` does not influence `loss`
    pub fn gradients(&self, loss: Var, wrt: &[Var]) -> Result<Vec<Array2<f32>>, ModelError> {
        if loss.0 >= self.nodes.len() {
            return Err(ModelError::ProcessingError(format!(
                "loss variable #{} is not on this tape",
                loss.0
            )));
        }
        self.scalar(loss)?;

        // inputs always precede their outputs, so nothing past `loss` can receive a gradient
        let mut adjoints: Vec<Option<Array2<f32>>> = vec![None; loss.0 + 1];
        adjoints[loss.0] = Some(Array2::ones((1, 1)));

        for index in (0..=loss.0).rev() {
            let Some(grad) = adjoints[index].take() else {
                continue;
            };
            let node = &self.nodes[index];

            match node.op {
                Op::Leaf => {}
                Op::MatMul(a, b) => {
                    accumulate(&mut adjoints, a, grad.dot(&self.value(b).t()));
                    accumulate(&mut adjoints, b, self.value(a).t().dot(&grad));
                }
                Op::Add(a, b) => {
                    let rows_a = self.value(a).nrows();
                    let rows_b = self.value(b).nrows();
                    let grad_b = if rows_b == 1 && rows_a != 1 {
                        grad.sum_axis(Axis(0)).insert_axis(Axis(0))
                    } else {
                        grad.clone()
                    };
                    accumulate(&mut adjoints, a, grad.clone());
                    accumulate(&mut adjoints, b, grad_b);
                }
                Op::Sub(a, b) => {
                    accumulate(&mut adjoints, a, grad.clone());
                    accumulate(&mut adjoints, b, -&grad);
                }
                Op::Mul(a, b) => {
                    accumulate(&mut adjoints, a, &grad * self.value(b));
                    accumulate(&mut adjoints, b, &grad * self.value(a));
                }
                Op::Scale(a, factor) => {
                    accumulate(&mut adjoints, a, &grad * factor);
                }
                Op::Sigmoid(a) => {
                    let local = node.value.mapv(|y| y * (1.0 - y));
                    accumulate(&mut adjoints, a, &grad * &local);
                }
                Op::Tanh(a) => {
                    let local = node.value.mapv(|y| 1.0 - y * y);
                    accumulate(&mut adjoints, a, &grad * &local);
                }
                Op::ConcatColumns(a, b) => {
                    let split = self.value(a).ncols();
                    accumulate(&mut adjoints, a, grad.slice(s![.., ..split]).to_owned());
                    accumulate(&mut adjoints, b, grad.slice(s![.., split..]).to_owned());
                }
                Op::Square(a) => {
                    let local = self.value(a).mapv(|x| 2.0 * x);
                    accumulate(&mut adjoints, a, &grad * &local);
                }
                Op::Mean(a) => {
                    let input = self.value(a);
                    let share = grad[[0, 0]] / input.len() as f32;
                    accumulate(&mut adjoints, a, Array2::from_elem(input.raw_dim(), share));
                }
            }

            adjoints[index] = Some(grad);
        }

        wrt.iter()
            .map(|var| {
                adjoints
                    .get(var.0)
                    .and_then(|grad| grad.clone())
                    .ok_or_else(|| ModelError::UnusedParameterGradient(format!("#{}", var.0)))
            })
            .collect()
    }
}

fn accumulate(adjoints: &mut [Option<Array2<f32>>], var: Var, contribution: Array2<f32>) {
    let slot = &mut adjoints[var.0];
    match slot {
        Some(existing) => *existing += &contribution,
        None => *slot = Some(contribution),
    }
}
