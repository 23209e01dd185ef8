#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Failed to allocate {numel} elements of {elem_size} bytes")]
    OutOfMemory { numel: usize, elem_size: usize },
    #[error("Index {index} out of range for dimension {dim} of size {size}")]
    IndexOutOfRange {
        dim: usize,
        index: usize,
        size: usize,
    },
    #[error("Shape mismatch, expected {expected} elements but got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Rank mismatch, expected {expected} dimensions but got {actual}")]
    RankMismatch { expected: usize, actual: usize },
}
