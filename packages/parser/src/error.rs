use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No elements found in {len} bytes of input")]
    NoElements { len: usize },
}

impl ParseError {
    pub fn no_elements(len: usize) -> Self {
        Self::NoElements { len }
    }
}
