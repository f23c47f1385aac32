use miette::Diagnostic;
use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error types for the analysis core
///
/// Every failure produced by this crate means a caller violated a documented
/// precondition. There are no recoverable or I/O errors at this layer; the
/// solver treats these as fatal and aborts the current transfer.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("Analysis invariant violated: {message}")]
    #[diagnostic(code(jsflow::invariant_violation))]
    InvariantViolation { message: String },
}

impl Error {
    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }
}
