use anyhow::Result;
use cadfx::core::Direction;
use cadfx::core::log::init_logging;
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(long)]
    config_path: Option<String>,

    /// Foreign currency ISO 4217 code for a one-shot conversion (ex: USD)
    #[arg(long, requires = "direction", requires = "amount")]
    currency: Option<String>,

    /// 'from' converts the foreign currency to CAD, 'to' converts CAD to it
    #[arg(long, requires = "currency")]
    direction: Option<Direction>,

    /// Amount to convert
    #[arg(long, requires = "currency")]
    amount: Option<Decimal>,

    /// Rate date (yyyy-MM-dd); omit to use the most recent rate
    #[arg(long, requires = "currency")]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let one_shot = match (&cli.currency, cli.direction, cli.amount) {
        (Some(currency), Some(direction), Some(amount)) => Some(cadfx::ConvertArgs {
            currency: currency.clone(),
            direction,
            amount,
            date: cli.date,
        }),
        _ => None,
    };

    let result = cadfx::run(cli.config_path.as_deref(), one_shot).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
