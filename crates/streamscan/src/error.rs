use thiserror::Error;

/// Why a scanner stopped producing tokens.
///
/// `R` is the error type of the [`Source`](crate::Source) and `P` the failure
/// type of the [`Split`](crate::Split) strategy. Reaching the end of the
/// source is not an error and has no variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError<R, P> {
    /// The source failed.
    #[error("read error: {0}")]
    Read(R),
    /// The split strategy reported a failure.
    #[error("split error: {0}")]
    Split(P),
    /// A token did not fit in the maximum buffer size.
    #[error("token too long")]
    TokenTooLong,
    /// The source kept returning no data and no error.
    #[error("multiple reads returned no data or error")]
    NoProgress,
}

impl<R, P> ScanError<R, P> {
    /// Returns `true` if the error came from the source.
    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read(_))
    }

    /// Returns `true` if the error came from the split strategy.
    #[must_use]
    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }
}
