use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmortizationError {
    #[error("invalid argument: {field} {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("decimal overflow while computing {context}")]
    Overflow { context: &'static str },
}

pub type Result<T> = std::result::Result<T, AmortizationError>;
