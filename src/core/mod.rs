//! Core business logic: validation, conversion and the observation port.

pub mod convert;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;
pub mod validate;

// Re-export main types for cleaner imports
pub use convert::{ConversionRequest, ConversionResult, Converter, Direction};
pub use error::ConvertError;
pub use rates::{FetchError, Observation, ObservationProvider};
