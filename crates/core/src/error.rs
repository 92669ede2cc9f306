use nlq_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The query text failed validation (empty, whitespace-only, or too long).
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] TextError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to compile query pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl QueryError {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::InvalidQuery(_))
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
