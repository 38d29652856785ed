//! Console surface: the interactive prompt loop and one-shot output.

pub mod prompt;

use anyhow::Result;
use chrono::Utc;
use console::style;
use rust_decimal::Decimal;

use crate::core::{ConversionRequest, ConversionResult, Converter, Direction, ObservationProvider};

/// Arguments for a single non-interactive conversion.
pub struct ConvertArgs {
    pub currency: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub date: Option<chrono::NaiveDate>,
}

/// Runs one conversion and prints the outcome. Errors propagate so the
/// process exits non-zero.
pub async fn run_once<P: ObservationProvider>(
    converter: &Converter<P>,
    args: &ConvertArgs,
) -> Result<()> {
    let request = ConversionRequest::new(&args.currency, args.direction, args.amount, args.date);
    let result = converter.convert(&request, Utc::now()).await?;
    print_result(request.amount, &result);
    Ok(())
}

/// Prints a conversion in the console layout:
/// amount and result, then the rate, then the rate's effective date.
pub fn print_result(amount: Decimal, result: &ConversionResult) {
    println!(
        "\n{:.4} {} is {} {}.",
        amount.round_dp(4),
        result.from_code,
        style(result.converted).green().bold(),
        result.to_code
    );
    println!("Exchange rate is {}", result.rate);
    println!("Exchange rate date is {}", result.rate_date.format("%Y-%m-%d"));
}
