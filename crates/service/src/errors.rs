use thiserror::Error;

/// Request-local failures. The display text is the message returned to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    MissingParameter(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn customer_not_found(id: &str) -> Self {
        Self::NotFound(format!("Customer with ID {id} not found."))
    }
}
