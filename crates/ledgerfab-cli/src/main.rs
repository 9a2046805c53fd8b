//! ledgerfab CLI - Synthetic enterprise dataset generation.
//!
//! # Commands
//!
//! - `ledgerfab generate` - Run a profile or config file and write CSV tables
//! - `ledgerfab calendar` - Write only the fiscal date dimension
//! - `ledgerfab init` - Write the TOML configuration of a profile
//! - `ledgerfab profiles` - List the built-in profiles
//!
//! # Examples
//!
//! ```bash
//! # Inventory dataset at a tenth of the preset volume
//! ledgerfab generate --profile inventory --scale 0.1 --output out/inventory
//!
//! # Start from a profile, edit, then generate from the file
//! ledgerfab init --profile financial-control --path cfo.toml
//! ledgerfab generate --config cfo.toml --seed 7
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{calendar, generate, init, profiles, ProfileArg};

/// ledgerfab - synthetic finance and operations datasets
#[derive(Parser)]
#[command(name = "ledgerfab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset and write it as CSV files
    Generate {
        /// Built-in profile (ignored when --config is given)
        #[arg(short, long, value_enum, default_value = "sales-performance")]
        profile: ProfileArg,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed; overrides the configuration
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory; overrides the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Multiply table sizes and daily volumes
        #[arg(long)]
        scale: Option<f64>,
    },

    /// Write only the calendar table
    Calendar {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Month the fiscal year starts in (1, 4 or 10)
        #[arg(long, default_value_t = 1)]
        fiscal_start: u32,

        /// Leave out weekends
        #[arg(long)]
        business_days: bool,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Write the configuration of a profile to a TOML file
    Init {
        /// Profile to start from
        #[arg(short, long, value_enum, default_value = "sales-performance")]
        profile: ProfileArg,

        /// File to write
        #[arg(long, default_value = "ledgerfab.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the built-in profiles
    Profiles,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate {
            profile,
            config,
            seed,
            output,
            start,
            end,
            scale,
        } => generate::execute(generate::GenerateArgs {
            profile: profile.into(),
            config,
            seed,
            output,
            start,
            end,
            scale,
            quiet: cli.quiet,
        }),

        Commands::Calendar {
            start,
            end,
            fiscal_start,
            business_days,
            output,
        } => calendar::execute(start, end, fiscal_start, business_days, &output),

        Commands::Init {
            profile,
            path,
            force,
        } => init::execute(profile.into(), &path, force),

        Commands::Profiles => {
            profiles::execute();
            Ok(())
        }

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "ledgerfab",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
