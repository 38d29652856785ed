//! Failure classification for conversion requests.

/// Classified outcome of a failed conversion.
///
/// Input defects (`MissingInput`, `InvalidInput`) carry the reason shown to
/// the user and are never worth retrying. `UpstreamUnavailable` is the only
/// variant a caller may reasonably retry.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Exchange rate not found for the entered date.")]
    NoDataForDate,

    #[error("Rate service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Unexpected response from rate service: {0}")]
    UnexpectedFailure(String),
}

impl ConvertError {
    /// True for defects in the caller's input, as opposed to upstream faults.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ConvertError::MissingInput(_) | ConvertError::InvalidInput(_)
        )
    }
}
