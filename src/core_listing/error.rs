use thiserror::Error;

/// Reasons a single LIST line could not be turned into an [`Entry`](super::Entry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("unsupported LIST line: expected at least 9 fields, got {0}")]
    TooFewFields(usize),

    #[error("unknown entry type '{0}'")]
    UnknownType(char),

    #[error("invalid size field: {0}")]
    InvalidSize(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),
}
