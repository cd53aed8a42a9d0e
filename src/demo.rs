//! The fixed batch and two-layer network run by the `forward-demo` binary.

use crate::error::Result;
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Three samples of four features each.
pub fn sample_input() -> Result<Matrix> {
    Matrix::from_flat(3, 4, &[
        1.0, 2.0, 3.0, 2.5,
        2.0, 5.0, -1.0, 2.0,
        -1.5, 2.7, 3.3, -0.8,
    ])
}

/// A 4 → 3 → 3 network.
pub fn sample_network() -> Result<Network> {
    let hidden = Layer::new(
        Matrix::from_flat(3, 4, &[
            0.2, 0.8, -0.5, 1.0,
            0.5, -0.91, 0.26, -0.5,
            -0.26, -0.27, 0.17, 0.87,
        ])?,
        vec![2.0, 3.0, 0.5],
    )?;
    let output = Layer::new(
        Matrix::from_flat(3, 3, &[
            0.1, -0.14, 0.5,
            -0.5, 0.12, -0.33,
            -0.44, 0.73, -0.13,
        ])?,
        vec![-1.0, 2.0, -0.5],
    )?;
    Network::new(vec![hidden, output])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &Matrix, expected: &[[f64; 3]; 3]) {
        assert_eq!(actual.shape(), (3, 3));
        for (row, want) in actual.data.iter().zip(expected.iter()) {
            for (a, b) in row.iter().zip(want.iter()) {
                assert!((a - b).abs() < 1e-9, "{a} != {b}");
            }
        }
    }

    #[test]
    fn demo_network_shape() {
        let sizes: Vec<(usize, usize)> = sample_network().unwrap().layers().iter()
            .map(|l| (l.input_size(), l.output_size()))
            .collect();
        assert_eq!(sizes, vec![(4, 3), (3, 3)]);
    }

    #[test]
    fn demo_network_activations() {
        let trace = sample_network().unwrap().forward_trace(&sample_input().unwrap()).unwrap();
        assert_eq!(trace.len(), 2);
        assert_close(&trace[0], &[
            [4.8, 1.21, 2.385],
            [8.9, -1.81, 0.2],
            [1.41, 1.051, 0.026],
        ]);
        assert_close(&trace[1], &[
            [0.5031, -1.04185, -2.03875],
            [0.2434, -2.7332, -5.7633],
            [-0.99314, 1.41254, -0.35655],
        ]);
    }
}
