use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Raw pixel data does not match the declared dimensions.
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Byte count implied by width × height × 4.
        expected: usize,
        /// Byte count actually supplied.
        actual: usize,
    },
}
