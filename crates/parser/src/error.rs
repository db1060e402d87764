use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Hard parse failures. Almost everything degrades instead (malformed
/// lines are skipped, missing fields come back empty); only input that
/// leaves nothing to build a graph from is an error.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("DOT input has no braced graph body")]
    MissingGraphBody,

    #[error("{0}")]
    Other(String),
}
