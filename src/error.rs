use thiserror::Error;

/// Every failure the library can report.
#[derive(Debug, Error)]
pub enum NnError {
    /// The radius ramp divides by `samples - 1`, so fewer than two samples
    /// per class cannot be generated.
    #[error("invalid sample count {samples}: at least 2 samples per class are required")]
    InvalidSampleCount { samples: usize },

    /// `samples * classes` does not fit in memory addressing.
    #[error("dataset of {samples} samples x {classes} classes is too large")]
    DatasetTooLarge { samples: usize, classes: usize },

    #[error("noise must be finite, got {noise}")]
    InvalidNoise { noise: f64 },

    #[error("point {index} is labeled {found}, expected {expected}")]
    Mislabeled { index: usize, expected: usize, found: usize },

    /// Operand shapes are incompatible. Shapes are `(rows, cols)`.
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },

    #[error("expected {expected} values, got {found}")]
    DataLength { expected: usize, found: usize },

    #[error("failed to write plot: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, NnError>;
