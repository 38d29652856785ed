//! Conversion orchestration between CAD and a foreign currency.
//!
//! Turns a validated request into a rate-series query, fetches a single
//! observation through the [`ObservationProvider`] port and maps it into a
//! [`ConversionResult`]. Holds no state between calls and performs no
//! retries; each conversion is one fetch at most.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::core::currency;
use crate::core::error::ConvertError;
use crate::core::rates::{FetchError, ObservationProvider};
use crate::core::validate::validate_request;

/// Valet publishes currency series under an `FX` prefix followed by the
/// source and destination codes, in that order. The label is
/// order-sensitive: `FXUSDCAD` and `FXCADUSD` are different series with
/// different published rates, not inverses of one numeric value.
pub const SERIES_PREFIX: &str = "FX";

/// Which way the conversion runs relative to CAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Convert an amount of the foreign currency into CAD.
    ForeignToCad,
    /// Convert an amount of CAD into the foreign currency.
    CadToForeign,
}

impl FromStr for Direction {
    type Err = ConvertError;

    /// Accepts the console vocabulary: `from` converts the foreign currency
    /// to CAD, `to` converts CAD to the foreign currency.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ConvertError::MissingInput(
                "Conversion type cannot be blank.".to_string(),
            ));
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "from" => Ok(Direction::ForeignToCad),
            "to" => Ok(Direction::CadToForeign),
            other => Err(ConvertError::InvalidInput(format!(
                "{other} is not a valid conversion type. Type should be 'from' or 'to'."
            ))),
        }
    }
}

/// One conversion to perform. Constructed fresh per call.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Uppercased ISO 4217 code of the foreign currency.
    pub foreign_code: String,
    pub direction: Direction,
    pub amount: Decimal,
    /// Rate date to use; `None` requests the most recent observation.
    pub date: Option<NaiveDate>,
}

impl ConversionRequest {
    pub fn new(
        foreign_code: &str,
        direction: Direction,
        amount: Decimal,
        date: Option<NaiveDate>,
    ) -> Self {
        ConversionRequest {
            foreign_code: foreign_code.trim().to_ascii_uppercase(),
            direction,
            amount,
            date,
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub from_code: String,
    pub to_code: String,
    /// Exchange rate exactly as published, precision untouched.
    pub rate: Decimal,
    /// `amount * rate` rounded to 4 decimal places, half-to-even.
    pub converted: Decimal,
    /// The date upstream reports for the observation actually used. For a
    /// most-recent request this is the publication date, not "today".
    pub rate_date: NaiveDate,
}

/// The conversion orchestrator, generic over the observation source.
pub struct Converter<P> {
    provider: P,
}

impl<P: ObservationProvider> Converter<P> {
    pub fn new(provider: P) -> Self {
        Converter { provider }
    }

    /// Validates the request, fetches the matching observation and computes
    /// the converted amount. `now` is the current instant, injected so the
    /// date rules stay deterministic under test.
    pub async fn convert(
        &self,
        request: &ConversionRequest,
        now: DateTime<Utc>,
    ) -> Result<ConversionResult, ConvertError> {
        validate_request(&request.foreign_code, request.date, now)?;

        let (from_code, to_code) = match request.direction {
            Direction::ForeignToCad => (request.foreign_code.as_str(), currency::CAD),
            Direction::CadToForeign => (currency::CAD, request.foreign_code.as_str()),
        };
        let series = format!("{SERIES_PREFIX}{from_code}{to_code}");
        debug!(%series, date = ?request.date, "Fetching rate observation");

        let observation = self
            .provider
            .fetch_observation(&series, request.date)
            .await
            .map_err(|e| match e {
                FetchError::NoData => ConvertError::NoDataForDate,
                FetchError::Transport(detail) => ConvertError::UpstreamUnavailable(detail),
                FetchError::Malformed(detail) => ConvertError::UnexpectedFailure(detail),
            })?;

        let raw_rate = observation.values.get(&series).ok_or_else(|| {
            ConvertError::UnexpectedFailure(format!(
                "series {series} missing from the returned observation"
            ))
        })?;
        let rate = Decimal::from_str(raw_rate).map_err(|e| {
            ConvertError::UnexpectedFailure(format!(
                "unparseable rate value '{raw_rate}' for {series}: {e}"
            ))
        })?;
        let rate_date =
            NaiveDate::parse_from_str(&observation.date, "%Y-%m-%d").map_err(|e| {
                ConvertError::UnexpectedFailure(format!(
                    "unparseable observation date '{}': {e}",
                    observation.date
                ))
            })?;

        // The amount is unconstrained user input; products beyond Decimal
        // range are an input defect, not a panic.
        let converted = request
            .amount
            .checked_mul(rate)
            .map(round_converted)
            .ok_or_else(|| {
                ConvertError::InvalidInput(
                    "The amount entered is too large to convert.".to_string(),
                )
            })?;
        debug!(%rate, %converted, %rate_date, "Conversion complete");

        Ok(ConversionResult {
            from_code: from_code.to_string(),
            to_code: to_code.to_string(),
            rate,
            converted,
            rate_date,
        })
    }
}

/// Converted amounts carry 4 decimal places, rounded half-to-even
/// (banker's rounding, the midpoint rule used for financial rounding).
fn round_converted(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven)
}
