use thiserror::Error;

/// Errors raised while parsing an [`Address`](super::Address).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The input was empty or only whitespace.
    #[error("Address cannot be empty")]
    Empty,

    /// The input contains characters outside the accepted alphabet
    /// (ASCII alphanumerics plus `:`, `_`, `-` and `.`).
    #[error("Invalid characters in address: {0}")]
    InvalidCharacters(String),

    #[error("Address is too long: {0} characters")]
    TooLong(usize),
}
