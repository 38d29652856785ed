//! Interactive prompt loop: collects conversion parameters line by line,
//! re-prompting on locally-invalid entries, then runs the conversion and
//! prints the result. Business-rule violations come back from the converter
//! with their reason; upstream faults print a generic line while the detail
//! goes to the log.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use console::style;
use rust_decimal::Decimal;
use tracing::error;

use crate::cli::print_result;
use crate::core::{ConversionRequest, Converter, Direction, ObservationProvider};

/// Reads one trimmed line. `None` means the input stream ended, so callers
/// stop prompting instead of looping on an empty buffer.
fn read_line(reader: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    println!("\n{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn read_foreign_currency(reader: &mut impl BufRead) -> Result<Option<String>> {
    let Some(mut input) = read_line(
        reader,
        "Please specify the foreign currency to convert to/from Canadian. \
         Please enter the ISO 4217 code (ex: USD, EUR, etc).",
    )?
    else {
        return Ok(None);
    };
    while input.is_empty() {
        match read_line(
            reader,
            "The foreign currency can't be empty. Please enter the foreign currency ISO code.",
        )? {
            Some(next) => input = next,
            None => return Ok(None),
        }
    }
    Ok(Some(input.to_ascii_uppercase()))
}

fn read_direction(reader: &mut impl BufRead, foreign_code: &str) -> Result<Option<Direction>> {
    let mut input = read_line(
        reader,
        &format!(
            "Please enter 'from' if you wish to convert from {foreign_code} to CAD, \
             or 'to' if you wish to convert from CAD to {foreign_code}."
        ),
    )?;
    loop {
        match input {
            None => return Ok(None),
            Some(ref text) => match Direction::from_str(text) {
                Ok(direction) => return Ok(Some(direction)),
                Err(_) => {
                    input =
                        read_line(reader, "Invalid conversion type. Please enter 'from' or 'to'.")?;
                }
            },
        }
    }
}

fn read_yes_no(reader: &mut impl BufRead, prompt: &str) -> Result<Option<bool>> {
    let mut input = read_line(reader, prompt)?;
    loop {
        match input.as_deref().map(str::to_ascii_lowercase) {
            None => return Ok(None),
            Some(answer) if answer == "yes" || answer == "no" => {
                return Ok(Some(answer == "yes"));
            }
            Some(_) => {
                input = read_line(reader, "Invalid entry. Please enter 'yes' or 'no'.")?;
            }
        }
    }
}

fn read_date(reader: &mut impl BufRead) -> Result<Option<NaiveDate>> {
    let mut input = read_line(
        reader,
        "Please enter the conversion date in the yyyy-MM-dd format. \
         The date has to be a weekday starting 2017.",
    )?;
    loop {
        match input {
            None => return Ok(None),
            Some(ref text) => match parse_date(text) {
                Some(date) => return Ok(Some(date)),
                None => {
                    input = read_line(
                        reader,
                        "The date is invalid. Please enter a valid date in the yyyy-MM-dd format.",
                    )?;
                }
            },
        }
    }
}

fn read_amount(reader: &mut impl BufRead) -> Result<Option<Decimal>> {
    let mut input = read_line(reader, "Please enter the amount that you wish to convert.")?;
    loop {
        match input {
            None => return Ok(None),
            Some(ref text) => match parse_amount(text) {
                Some(amount) => return Ok(Some(amount)),
                None => {
                    input = read_line(reader, "Invalid input, please enter a numeric amount.")?;
                }
            },
        }
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

fn parse_amount(input: &str) -> Option<Decimal> {
    Decimal::from_str(input.trim()).ok()
}

/// Runs conversions until the user declines another round or the input
/// stream ends.
pub async fn run_interactive<P: ObservationProvider>(converter: &Converter<P>) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        let Some(foreign_code) = read_foreign_currency(&mut reader)? else {
            return Ok(());
        };
        let Some(direction) = read_direction(&mut reader, &foreign_code)? else {
            return Ok(());
        };
        let date = match read_yes_no(
            &mut reader,
            "Do you wish to use a specific conversion date? Enter yes or no.",
        )? {
            None => return Ok(()),
            Some(true) => match read_date(&mut reader)? {
                Some(date) => Some(date),
                None => return Ok(()),
            },
            Some(false) => None,
        };
        let Some(amount) = read_amount(&mut reader)? else {
            return Ok(());
        };

        let request = ConversionRequest::new(&foreign_code, direction, amount, date);
        match converter.convert(&request, Utc::now()).await {
            Ok(result) => print_result(request.amount, &result),
            Err(e) if e.is_input_error() => {
                println!("\n{}", style(format!("Error: {e}")).red());
            }
            Err(e @ crate::core::ConvertError::NoDataForDate) => {
                println!("\n{}", style(format!("Error: {e}")).red());
            }
            Err(e) => {
                error!(error = %e, "Conversion failed");
                println!(
                    "\n{}",
                    style("An error has occurred, please try again later.").red()
                );
            }
        }

        match read_yes_no(
            &mut reader,
            "Do you wish to do another conversion? Type 'yes' to continue or 'no' to quit.",
        )? {
            Some(true) => continue,
            Some(false) | None => return Ok(()),
        }
    }
}
