//! TRP CLI - Tournament results processor for MicroRTS
//!
//! Commands:
//! - show: Win rates of one tournament, per map and overall
//! - compare: Win-rate changes between two tournaments
//! - focus: One bot against each opponent, optionally compared

mod compare_cmd;
mod focus_cmd;
mod render;
mod report;
mod show_cmd;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trp")]
#[command(about = "MicroRTS tournament results processor")]
#[command(version)]
struct Cli {
    /// More logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show win rates per map and overall
    Show(show_cmd::ShowArgs),
    /// Compare two tournaments
    Compare(compare_cmd::CompareArgs),
    /// Show one bot against each of its opponents
    Focus(focus_cmd::FocusArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Show(args) => show_cmd::run(args),
        Commands::Compare(args) => compare_cmd::run(args),
        Commands::Focus(args) => focus_cmd::run(args),
    }
}

/// Log to stderr so tables on stdout stay clean
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
