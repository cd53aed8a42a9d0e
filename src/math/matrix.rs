use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{NnError, Result};

/// Dense row-major matrix of `f64`.
///
/// Every constructor checks that all rows have `cols` entries, so the shape
/// fields can be trusted by the arithmetic below. Deserialization goes
/// through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = NnError;

    fn try_from(raw: RawMatrix) -> Result<Matrix> {
        if raw.data.len() != raw.rows {
            return Err(NnError::DataLength { expected: raw.rows, found: raw.data.len() });
        }
        for (row, values) in raw.data.iter().enumerate() {
            if values.len() != raw.cols {
                return Err(NnError::RaggedRows { row, expected: raw.cols, found: values.len() });
            }
        }
        Ok(Matrix { rows: raw.rows, cols: raw.cols, data: raw.data })
    }
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from nested rows. An empty `data` gives a 0×0 matrix.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        for (row, values) in data.iter().enumerate() {
            if values.len() != cols {
                return Err(NnError::RaggedRows { row, expected: cols, found: values.len() });
            }
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// Builds a `rows × cols` matrix from values laid out row after row.
    pub fn from_flat(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix> {
        if values.len() != rows * cols {
            return Err(NnError::DataLength { expected: rows * cols, found: values.len() });
        }
        if cols == 0 {
            return Ok(Matrix::zeros(rows, 0));
        }
        Ok(Matrix {
            rows,
            cols,
            data: values.chunks(cols).map(|chunk| chunk.to_vec()).collect(),
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.data.get(row).map(|r| r.as_slice())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::ShapeMismatch {
                op: "matmul",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Element-wise sum of two same-shape matrices.
    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.shape() != rhs.shape() {
            return Err(NnError::ShapeMismatch {
                op: "add",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x + y).collect()
            })
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Adds `row` to every row of `self`. The row is replicated once per
    /// row of `self`, however many there are.
    pub fn add_row_broadcast(&self, row: &[f64]) -> Result<Matrix> {
        if row.len() != self.cols {
            return Err(NnError::ShapeMismatch {
                op: "add_row_broadcast",
                left: self.shape(),
                right: (1, row.len()),
            });
        }

        Ok(self.map_rows(|values| {
            values.iter().zip(row.iter()).map(|(x, b)| x + b).collect()
        }))
    }

    fn map_rows<F>(&self, functor: F) -> Matrix
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|row| functor(row.as_slice())).collect(),
        }
    }
}

/// Renders the matrix as a bracketed table with right-aligned columns:
///
/// ```text
/// ⎡ 4.8   1.21  2.385⎤
/// ⎢ 8.9  -1.81    0.2⎥
/// ⎣1.41  1.051  0.026⎦
/// ```
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 {
            return write!(f, "[]");
        }

        let cells: Vec<Vec<String>> = self.data.iter()
            .map(|row| row.iter().map(|x| format!("{}", x)).collect())
            .collect();
        let widths: Vec<usize> = (0..self.cols)
            .map(|j| cells.iter().map(|row| row[j].len()).max().unwrap_or(0))
            .collect();

        for (i, row) in cells.iter().enumerate() {
            let (open, close) = match i {
                _ if self.rows == 1 => ('[', ']'),
                0 => ('⎡', '⎤'),
                _ if i == self.rows - 1 => ('⎣', '⎦'),
                _ => ('⎢', '⎥'),
            };
            let line = row.iter().zip(widths.iter())
                .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
                .collect::<Vec<_>>()
                .join("  ");
            write!(f, "{}{}{}", open, line, close)?;
            if i + 1 < self.rows {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flat_lays_out_rows() {
        let m = Matrix::from_flat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn from_flat_rejects_wrong_length() {
        let err = Matrix::from_flat(2, 2, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, NnError::DataLength { expected: 4, found: 3 }));
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NnError::RaggedRows { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn from_data_empty_is_zero_by_zero() {
        let m = Matrix::from_data(vec![]).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn transpose_swaps_shape() {
        let m = Matrix::from_flat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), Some(6.0));
        assert_eq!(t.get(0, 1), Some(4.0));
    }

    #[test]
    fn matmul_checks_inner_dimension() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let err = a.matmul(&b).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { op: "matmul", left: (2, 3), right: (2, 3) }));
    }

    #[test]
    fn matmul_multiplies() {
        let a = Matrix::from_flat(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_flat(2, 1, &[5.0, 6.0]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data, vec![vec![17.0], vec![39.0]]);
    }

    #[test]
    fn broadcast_covers_every_row() {
        // Five rows: more than any fixed replication count would cover.
        let m = Matrix::zeros(5, 2);
        let out = m.add_row_broadcast(&[1.0, -1.0]).unwrap();
        assert!(out.data.iter().all(|row| row == &vec![1.0, -1.0]));
    }

    #[test]
    fn broadcast_rejects_wrong_width() {
        let m = Matrix::zeros(3, 3);
        assert!(m.add_row_broadcast(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn add_rejects_mismatched_shapes() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(2, 3);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn deserialize_checks_shape() {
        let err = serde_json::from_str::<Matrix>(r#"{"rows":2,"cols":2,"data":[[1.0,2.0]]}"#).unwrap_err();
        assert!(err.to_string().contains("expected 2 values, got 1"));

        let err = serde_json::from_str::<Matrix>(r#"{"rows":2,"cols":2,"data":[[1.0,2.0],[3.0]]}"#).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 columns"));

        let m: Matrix = serde_json::from_str(r#"{"rows":1,"cols":2,"data":[[1.0,2.0]]}"#).unwrap();
        assert_eq!(m, Matrix::from_flat(1, 2, &[1.0, 2.0]).unwrap());
    }

    #[test]
    fn display_aligns_columns() {
        let m = Matrix::from_flat(2, 2, &[1.5, -2.0, 10.0, 3.25]).unwrap();
        assert_eq!(m.to_string(), "⎡1.5    -2⎤\n⎣ 10  3.25⎦");
    }

    #[test]
    fn display_single_row_uses_plain_brackets() {
        let m = Matrix::from_flat(1, 2, &[2.0, 0.0]).unwrap();
        assert_eq!(m.to_string(), "[2  0]");
    }
}
