//! Rate observation port: the capability the converter uses to fetch
//! published exchange-rate observations.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// A single published data point for one or more rate series.
///
/// `date` is the reported date string exactly as upstream published it;
/// `values` maps a series label (e.g. `FXUSDCAD`) to its string-encoded
/// decimal rate. Both are kept raw here so the converter owns the parsing
/// and its failure classification.
#[derive(Debug, Clone)]
pub struct Observation {
    pub date: String,
    pub values: HashMap<String, String>,
}

/// Failures a provider can report. "No data" is a legitimate outcome and is
/// kept distinct from transport faults so callers can classify them apart.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no observations available for the requested date")]
    NoData,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Fetches the observation for a rate series, either pinned to a date or
/// the most recent one available when `date` is `None`.
#[async_trait]
pub trait ObservationProvider: Send + Sync {
    async fn fetch_observation(
        &self,
        series: &str,
        date: Option<NaiveDate>,
    ) -> Result<Observation, FetchError>;
}
