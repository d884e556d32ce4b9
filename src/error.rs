use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TrendError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl TrendError {
    pub fn unknown(kind: &str, id: &str) -> Self {
        Self::InvalidArgument(format!("unknown {kind} '{id}'"))
    }
}

pub type TrendResult<T> = Result<T, TrendError>;
