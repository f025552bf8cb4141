use thiserror::Error;

/// The errors raised while encoding, solving or decoding a distance cover problem.
///
/// Encoding errors are detected eagerly, before any solver is called.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverError {
    /// The input metric space or one of its generators is malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The stabilizer chain construction exceeded its budget.
    #[error("resource exhausted at stabilizer level {level} after {operations} operations")]
    ResourceExhausted {
        /// The level under construction when the budget was exceeded
        level: usize,
        /// The number of elementary operations performed so far
        operations: u64,
    },

    /// A solver assignment is not compatible with the instance it is decoded against.
    #[error("decode error: {0}")]
    Decode(String),

    /// The solver did not return before the deadline.
    #[error("the solver timed out after {0:?}")]
    SolverTimeout(std::time::Duration),

    /// The solver failed for another reason.
    #[error("solver failure: {0}")]
    SolverFailure(String),
}

impl CoverError {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        CoverError::Configuration(message.into())
    }

    pub(crate) fn decode<S: Into<String>>(message: S) -> Self {
        CoverError::Decode(message.into())
    }

    pub(crate) fn solver_failure<S: Into<String>>(message: S) -> Self {
        CoverError::SolverFailure(message.into())
    }
}

/// The result type of the library operations.
pub type Result<T> = std::result::Result<T, CoverError>;
