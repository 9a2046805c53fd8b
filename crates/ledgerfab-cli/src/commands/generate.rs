//! `ledgerfab generate` command - Run the pipeline and write CSV tables.

use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use ledgerfab::config::{FabricConfig, Profile};
use ledgerfab::fabric::DataFabricPipeline;
use ledgerfab::sink::CsvSink;
use ledgerfab::summary::DatasetSummary;

use super::print_tables;
use crate::error::{CliError, CliResult};

/// Options of a generate run.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Profile used when no config file is given.
    pub profile: Profile,
    /// Configuration file.
    pub config: Option<PathBuf>,
    /// Seed override.
    pub seed: Option<u64>,
    /// Output directory override.
    pub output: Option<PathBuf>,
    /// Start date override.
    pub start: Option<NaiveDate>,
    /// End date override.
    pub end: Option<NaiveDate>,
    /// Volume scale.
    pub scale: Option<f64>,
    /// Skip the summary printout.
    pub quiet: bool,
}

/// Resolve the configuration from a file or profile plus overrides.
pub fn resolve_config(args: &GenerateArgs) -> CliResult<FabricConfig> {
    let mut config = match &args.config {
        Some(path) => FabricConfig::load(path)?,
        None => FabricConfig::for_profile(args.profile),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(Some(seed));
    }
    if let Some(dir) = &args.output {
        config = config.with_output_dir(dir);
    }
    let start = args.start.unwrap_or(config.calendar.start);
    let end = args.end.unwrap_or(config.calendar.end);
    config = config.with_dates(start, end);
    if let Some(scale) = args.scale {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(CliError::Config(format!(
                "scale must be a positive number, got {scale}"
            )));
        }
        config = config.scaled(scale);
    }
    Ok(config)
}

/// Execute the `generate` command.
pub fn execute(args: GenerateArgs) -> CliResult<()> {
    let config = resolve_config(&args)?;
    let label = config
        .profile
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| "custom".to_string());

    if !args.quiet {
        println!(
            "{} Generating {} dataset ({} to {})",
            "→".bright_cyan(),
            label.bright_yellow(),
            config.calendar.start,
            config.calendar.end
        );
    }

    let sink = CsvSink::new(&config.output_dir);
    let mut pipeline = DataFabricPipeline::new(config)?;
    let dataset = pipeline.run()?;
    let written = dataset.write_to(&sink)?;

    if args.quiet {
        return Ok(());
    }

    let summary = DatasetSummary::of(&dataset);
    println!();
    print_tables(&written);
    println!();
    println!("  {} {}", "Seed:".dimmed(), summary.seed.to_string().bright_white());
    println!(
        "  {} {}",
        "Rows:".dimmed(),
        summary.total_rows().to_string().bright_white()
    );
    println!(
        "  {} {:.2}s",
        "Time:".dimmed(),
        pipeline.stats().running_time_seconds
    );
    let kpis = summary.kpis();
    if !kpis.is_empty() {
        println!();
        for (name, value) in kpis {
            println!("  {} {value:>16.4}", format!("{name:<24}").bright_white());
        }
    }
    println!();
    println!(
        "{} Wrote {} tables to {}",
        "✓".bright_green().bold(),
        written.len(),
        sink.dir().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GenerateArgs {
        GenerateArgs {
            profile: Profile::Inventory,
            config: None,
            seed: None,
            output: None,
            start: None,
            end: None,
            scale: None,
            quiet: true,
        }
    }

    #[test]
    fn test_overrides_apply() {
        let config = resolve_config(&GenerateArgs {
            seed: Some(3),
            output: Some(PathBuf::from("out")),
            end: NaiveDate::from_ymd_opt(2023, 3, 31),
            ..args()
        })
        .unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.calendar.end, NaiveDate::from_ymd_opt(2023, 3, 31).unwrap());
        assert_eq!(config.profile, Some(Profile::Inventory));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = resolve_config(&GenerateArgs {
            scale: Some(0.0),
            ..args()
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_generate_writes_files() {
        let tmp = tempfile::tempdir().unwrap();
        execute(GenerateArgs {
            seed: Some(1),
            output: Some(tmp.path().to_path_buf()),
            end: NaiveDate::from_ymd_opt(2023, 2, 28),
            scale: Some(0.05),
            ..args()
        })
        .unwrap();
        assert!(tmp.path().join("dim_date.csv").exists());
        assert!(tmp.path().join("mseg_movements.csv").exists());
    }
}
