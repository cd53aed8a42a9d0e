use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// A fully connected layer.
///
/// `weights` has one row per output neuron (`output_size × input_size`) and
/// `biases` has one entry per output neuron. The layer keeps no state between
/// calls, so the same value can be fed any number of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayer")]
pub struct Layer{
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

#[derive(Deserialize)]
struct RawLayer {
    weights: Matrix,
    biases: Vec<f64>,
}

impl TryFrom<RawLayer> for Layer {
    type Error = NnError;

    fn try_from(raw: RawLayer) -> Result<Layer> {
        Layer::new(raw.weights, raw.biases)
    }
}

impl Layer {
    pub fn new(weights: Matrix, biases: Vec<f64>) -> Result<Layer> {
        if weights.rows != biases.len() {
            return Err(NnError::ShapeMismatch {
                op: "layer",
                left: weights.shape(),
                right: (1, biases.len()),
            });
        }
        Ok(Layer { weights, biases })
    }

    /// Number of features each input row must have.
    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    /// Number of neurons, i.e. columns of the output.
    pub fn output_size(&self) -> usize {
        self.weights.rows
    }

    /// Runs `input` (one sample per row) through the layer.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        forward(input, &self.weights, &self.biases)
    }
}

/// Computes `input · weightsᵀ + biases`, adding `biases` to every output row.
///
/// `input` is `R × C`, `weights` is `O × C` and `biases` has length `O`; the
/// result is `R × O`. Any other combination of shapes is a
/// [`NnError::ShapeMismatch`].
pub fn forward(input: &Matrix, weights: &Matrix, biases: &[f64]) -> Result<Matrix> {
    if input.cols != weights.cols {
        return Err(NnError::ShapeMismatch {
            op: "forward",
            left: input.shape(),
            right: weights.shape(),
        });
    }
    if weights.rows != biases.len() {
        return Err(NnError::ShapeMismatch {
            op: "forward",
            left: weights.shape(),
            right: (1, biases.len()),
        });
    }

    let z = input.matmul(&weights.transpose())?.add_row_broadcast(biases)?;
    debug!(input = ?input.shape(), output = ?z.shape(), "dense forward");
    Ok(z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: usize, cols: usize, values: &[f64]) -> Matrix {
        Matrix::from_flat(rows, cols, values).unwrap()
    }

    #[test]
    fn forward_selects_through_weights() {
        let out = forward(&m(1, 2, &[1.0, 0.0]), &m(2, 2, &[2.0, 0.0, 0.0, 3.0]), &[0.0, 0.0]).unwrap();
        assert_eq!(out, m(1, 2, &[2.0, 0.0]));
    }

    #[test]
    fn forward_adds_bias() {
        let out = forward(&m(1, 2, &[1.0, 1.0]), &m(1, 2, &[1.0, 1.0]), &[5.0]).unwrap();
        assert_eq!(out, m(1, 1, &[7.0]));
    }

    #[test]
    fn forward_rejects_column_mismatch() {
        let err = forward(&m(1, 3, &[1.0, 2.0, 3.0]), &m(2, 2, &[1.0; 4]), &[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { op: "forward", left: (1, 3), right: (2, 2) }));
    }

    #[test]
    fn forward_rejects_bias_length_mismatch() {
        let err = forward(&m(1, 2, &[1.0, 2.0]), &m(2, 2, &[1.0; 4]), &[0.0]).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { .. }));
    }

    #[test]
    fn bias_is_broadcast_to_non_square_outputs() {
        // 4 rows in, 2 neurons out: the bias must reach every one of the 4x2 cells.
        let input = Matrix::zeros(4, 3);
        let out = forward(&input, &Matrix::zeros(2, 3), &[0.5, -1.5]).unwrap();
        assert_eq!(out.shape(), (4, 2));
        assert!(out.data.iter().all(|row| row == &vec![0.5, -1.5]));
    }

    #[test]
    fn layer_new_validates_bias_length() {
        assert!(Layer::new(Matrix::zeros(3, 4), vec![0.0; 2]).is_err());
        let layer = Layer::new(Matrix::zeros(3, 4), vec![0.0; 3]).unwrap();
        assert_eq!((layer.input_size(), layer.output_size()), (4, 3));
    }

    #[test]
    fn deserialize_validates_bias_length() {
        let json = r#"{"weights":{"rows":2,"cols":1,"data":[[1.0],[2.0]]},"biases":[0.0]}"#;
        let err = serde_json::from_str::<Layer>(json).unwrap_err();
        assert!(err.to_string().contains("shape mismatch in layer"));

        let json = r#"{"weights":{"rows":2,"cols":1,"data":[[1.0],[2.0]]},"biases":[0.0,1.0]}"#;
        let layer: Layer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.output_size(), 2);
    }

    #[test]
    fn layer_is_reusable() {
        let layer = Layer::new(m(1, 2, &[1.0, -1.0]), vec![0.0]).unwrap();
        let a = layer.forward(&m(1, 2, &[3.0, 1.0])).unwrap();
        let b = layer.forward(&m(2, 2, &[1.0, 3.0, 0.0, 0.0])).unwrap();
        assert_eq!(a, m(1, 1, &[2.0]));
        assert_eq!(b, m(2, 1, &[-2.0, 0.0]));
    }
}
