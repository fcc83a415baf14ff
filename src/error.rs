//! Error types returned by the public functions of this crate.
//!
//! Internally we use `anyhow` and attach context as errors bubble up. At the public boundary each
//! error is tagged with an `ErrorType` so that callers, like the interactive menu, can decide what
//! to do without string matching.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type. Used wherever the kind of failure does not matter to the caller.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies an `Error`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// User input that should have been a number was not.
    InvalidAmount,
    /// A menu key outside of the enumerated set.
    InvalidCategory,
    /// A category name that is not in the registry.
    UnknownCategory,
    /// A removal position outside of the current listing.
    OutOfRange,
    /// A cell in the sheet that should have held a number did not.
    MalformedCell,
    /// The sheet could not be reached, or we were not authorized to use it.
    StoreUnavailable,
    /// The configuration directory or file is missing or invalid.
    Config,
    /// Reading from or writing to the console failed.
    Io,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. Holds an `ErrorType` and the underlying `anyhow` error chain.
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    /// Creates an error from a message alone.
    pub(crate) fn msg(error_type: ErrorType, message: impl Display) -> Self {
        Self::new(error_type, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.error_type, self.source)
    }
}

impl Display for Error {
    /// Prints the full context chain, e.g. `Unable to add expense: invalid digit found in string`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = self.source.as_ref();
        Some(source)
    }
}

/// Converts an internal result into a public `Result` by tagging the error with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_keeps_context() {
        let res: Res<()> = Err(anyhow::anyhow!("bad digit")).context("Unable to parse amount");
        let err = res.pub_result(ErrorType::InvalidAmount).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidAmount);
        assert_eq!(err.to_string(), "Unable to parse amount: bad digit");
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::StoreUnavailable.to_string(), "store_unavailable");
        assert_eq!(
            "out_of_range".parse::<ErrorType>().unwrap(),
            ErrorType::OutOfRange
        );
    }
}
