//! Business-rule validation for conversion requests.
//!
//! Pure checks, no I/O: every rule runs before any network call is made.
//! The current instant is an explicit parameter so the future-date and
//! publication-cutoff rules are deterministic under test.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::core::currency;
use crate::core::error::ConvertError;

/// Rates are published in Bank of Canada's reference time zone.
pub const RATE_TZ: Tz = chrono_tz::America::Toronto;

/// Daily rates are published at 16:30 Eastern on business days.
const PUBLICATION_CUTOFF: NaiveTime = NaiveTime::from_hms_opt(16, 30, 0).unwrap();

/// Valet's currency history starts in 2017.
const EARLIEST_YEAR: i32 = 2017;

/// Checks a conversion request's inputs in a fixed order and returns the
/// first rule violation. When `date` is `None` the date rules are skipped
/// and the most recent observation will be requested instead.
pub fn validate_request(
    foreign_code: &str,
    date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<(), ConvertError> {
    if foreign_code.trim().is_empty() {
        return Err(ConvertError::MissingInput(
            "Foreign currency cannot be empty.".to_string(),
        ));
    }

    if foreign_code == currency::CAD {
        return Err(ConvertError::InvalidInput(
            "Foreign currency cannot be CAD.".to_string(),
        ));
    }

    if !currency::is_known_code(foreign_code) {
        return Err(ConvertError::InvalidInput(format!(
            "{foreign_code} is not a valid ISO code."
        )));
    }

    if let Some(date) = date {
        let now_eastern = now.with_timezone(&RATE_TZ);
        let today = now_eastern.date_naive();

        if date > today {
            return Err(ConvertError::InvalidInput(format!(
                "The date entered {date} is in the future."
            )));
        }

        if date.year() < EARLIEST_YEAR {
            return Err(ConvertError::InvalidInput(format!(
                "The date entered {date} is before {EARLIEST_YEAR}. \
                 Bank of Canada's currency history goes as far back as {EARLIEST_YEAR}."
            )));
        }

        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(ConvertError::InvalidInput(format!(
                "The date entered {date} is not a weekday. \
                 Bank of Canada rates are updated weekdays at 16:30 ET."
            )));
        }

        if date == today && now_eastern.time() < PUBLICATION_CUTOFF {
            return Err(ConvertError::InvalidInput(
                "The exchange rate has not been updated today yet. \
                 Bank of Canada rates are updated weekdays at 16:30 ET."
                    .to_string(),
            ));
        }
    }

    Ok(())
}
