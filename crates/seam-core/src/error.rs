use crate::dtype::DType;

/// Errors produced by tensor operations.
#[derive(Debug, thiserror::Error)]
pub enum SeamError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("axis {axis} out of range for rank-{rank} tensor")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("axis {axis} has size {size}, expected a singleton")]
    NonSingletonAxis { axis: usize, size: usize },

    #[error("cannot reshape {numel} elements into {shape:?}")]
    InvalidReshape { numel: usize, shape: Vec<usize> },

    #[error("unsupported dtype {0} for this operation")]
    UnsupportedDType(DType),

    #[error("{0}")]
    Unsupported(String),
}
