// ============================================================================
// pi-generate
// Prints a decimal approximation of pi
// ============================================================================

use clap::Parser as ClapParser;
use pi_search::prelude::*;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(ClapParser)]
#[command(name = "pi-generate")]
#[command(about = "Approximate pi with the Chudnovsky series", long_about = None)]
#[command(version)]
struct Cli {
    /// Significant digits in the printed result
    #[arg(default_value_t = 20, allow_negative_numbers = true)]
    significant_digits: i64,

    /// Index of the last series term to include
    #[arg(default_value_t = 10, allow_negative_numbers = true)]
    term_count: i64,

    /// Recompute factorials instead of memoizing them
    #[arg(long)]
    no_cache: bool,

    /// Worker threads (default: one per core)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Rounding policy: up, down, ceiling, floor, half-up, half-down, half-even
    #[arg(short, long, default_value = "half-even")]
    rounding: RoundingPolicy,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    eprintln!(
        "printing PI with {} precision, after {} iterations",
        cli.significant_digits, cli.term_count
    );

    match run(&cli) {
        Ok(pi) => {
            println!("{}", pi);
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> PiResult<BigDecimal> {
    let ctx = PrecisionContext::new(cli.significant_digits, cli.rounding)?;

    let mut builder = PiCalculatorBuilder::new().event_handler(event_handler());
    if let Some(workers) = cli.workers {
        builder = builder.workers(workers);
    }

    builder
        .build()?
        .calculate(cli.term_count, &ctx, !cli.no_cache)
}

#[cfg(feature = "logging")]
fn event_handler() -> Arc<dyn EventHandler> {
    Arc::new(LoggingEventHandler)
}

#[cfg(not(feature = "logging"))]
fn event_handler() -> Arc<dyn EventHandler> {
    Arc::new(NoOpEventHandler)
}
