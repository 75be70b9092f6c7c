use thiserror::Error;

pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised while decoding shared domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid website id: {0}")]
    InvalidId(String),
}
