mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::loan::PaymentArgs;
use commands::quote::QuoteArgs;
use commands::session::SessionArgs;

/// Vehicle finance quotations
#[derive(Parser)]
#[command(
    name = "dfin",
    version,
    about = "Vehicle finance quotations",
    long_about = "Quote standard loan, balloon loan and lease payments for a vehicle with \
                  decimal precision, replay recorded finance sessions, and print loan \
                  and balloon amortization schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine defaults (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote every finance product for a vehicle
    Quote(QuoteArgs),
    /// Monthly payment (and optional schedule) for a plain loan
    Payment(PaymentArgs),
    /// Month-by-month repayment schedule for one product of a quote
    Schedule(QuoteArgs),
    /// Replay a recorded sequence of edits and print the final state
    Session(SessionArgs),
    /// List finance products in carousel order
    Products,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "dealer_finance_core=debug,dfin=debug"
    } else {
        "warn"
    };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine_config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::quote::run_quote(args, &engine_config),
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::quote::run_schedule(args, &engine_config),
        Commands::Session(args) => commands::session::run_session(args, &engine_config),
        Commands::Products => commands::products::run_products(),
        Commands::Version => {
            println!("dfin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
