mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::closing_costs::{ClosingCostArgs, TablesArgs};
use commands::mortgage::{AnalyzeArgs, PaymentArgs, RecordArgs, ScheduleArgs};

/// Mortgage payment, amortization and closing cost calculations
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "Mortgage payment, amortization and closing cost calculations",
    long_about = "A CLI for estimating fixed-rate mortgage payments, yearly amortization \
                  schedules and Canadian closing costs (land transfer taxes, legal and \
                  inspection fees) with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log input resolution and table loading to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the periodic mortgage payment and lifetime totals
    Payment(PaymentArgs),
    /// Build the yearly amortization schedule for a loan
    Schedule(ScheduleArgs),
    /// Estimate closing costs for a purchase
    ClosingCosts(ClosingCostArgs),
    /// Payment, schedule and closing costs in one pass
    Analyze(AnalyzeArgs),
    /// Build a calculation record ready for storage
    Record(RecordArgs),
    /// Print the jurisdiction tables in use
    Tables(TablesArgs),
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

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("{}: logger unavailable: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::ClosingCosts(args) => commands::closing_costs::run_closing_costs(args),
        Commands::Analyze(args) => commands::mortgage::run_analyze(args),
        Commands::Record(args) => commands::mortgage::run_record(args),
        Commands::Tables(args) => commands::closing_costs::run_tables(args),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
