use crate::error::{NnError, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;

/// Layers applied one after another, each feeding the next.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network, checking that every layer accepts the previous
    /// layer's output width.
    pub fn new(layers: Vec<Layer>) -> Result<Network> {
        for pair in layers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.output_size() != next.input_size() {
                return Err(NnError::ShapeMismatch {
                    op: "network",
                    left: prev.weights.shape(),
                    right: next.weights.shape(),
                });
            }
        }
        Ok(Network { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Forward pass returning only the last layer's output. A network with
    /// no layers returns the input unchanged.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Forward pass returning every layer's output, first layer first.
    pub fn forward_trace(&self, input: &Matrix) -> Result<Vec<Matrix>> {
        let mut outputs: Vec<Matrix> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let next = layer.forward(outputs.last().unwrap_or(input))?;
            outputs.push(next);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(rows: usize, cols: usize, weights: &[f64], biases: &[f64]) -> Layer {
        Layer::new(Matrix::from_flat(rows, cols, weights).unwrap(), biases.to_vec()).unwrap()
    }

    #[test]
    fn rejects_mismatched_chain() {
        let first = layer(3, 2, &[1.0; 6], &[0.0; 3]);
        let second = layer(1, 2, &[1.0; 2], &[0.0]);
        assert!(matches!(
            Network::new(vec![first, second]),
            Err(NnError::ShapeMismatch { op: "network", .. })
        ));
    }

    #[test]
    fn trace_matches_forward() {
        let net = Network::new(vec![
            layer(2, 2, &[1.0, 0.0, 0.0, 1.0], &[1.0, 1.0]),
            layer(1, 2, &[1.0, 1.0], &[0.0]),
        ]).unwrap();
        let input = Matrix::from_flat(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();

        let trace = net.forward_trace(&input).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0], Matrix::from_flat(2, 2, &[2.0, 3.0, 4.0, 5.0]).unwrap());
        assert_eq!(trace[1], Matrix::from_flat(2, 1, &[5.0, 9.0]).unwrap());
        assert_eq!(net.forward(&input).unwrap(), trace[1]);
    }

    #[test]
    fn empty_network_is_identity() {
        let net = Network::new(vec![]).unwrap();
        let input = Matrix::from_flat(1, 2, &[1.0, 2.0]).unwrap();
        assert_eq!(net.forward(&input).unwrap(), input);
        assert!(net.forward_trace(&input).unwrap().is_empty());
    }
}
