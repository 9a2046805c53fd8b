//! `ledgerfab init` command - Write a profile configuration to disk.

use std::fs;
use std::path::Path;

use colored::Colorize;
use ledgerfab::config::{FabricConfig, Profile};

use crate::error::{CliError, CliResult};

/// Execute the `init` command.
pub fn execute(profile: Profile, path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    let config = FabricConfig::for_profile(profile);
    let body = config.to_toml_string()?;
    let text = format!(
        "# ledgerfab configuration\n# profile: {} - {}\n\n{body}",
        profile.name(),
        profile.description()
    );
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;

    println!(
        "{} Wrote {} configuration to {}",
        "✓".bright_green().bold(),
        profile.name().bright_yellow(),
        path.display()
    );
    println!(
        "  Run {} to generate it",
        format!("ledgerfab generate --config {}", path.display()).bright_white()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_config_loads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cfo.toml");
        execute(Profile::FinancialControl, &path, false).unwrap();

        let loaded = FabricConfig::load(&path).unwrap();
        assert_eq!(loaded, FabricConfig::for_profile(Profile::FinancialControl));
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ledgerfab.toml");
        fs::write(&path, "seed = 1\n").unwrap();

        assert!(matches!(
            execute(Profile::Inventory, &path, false),
            Err(CliError::Config(_))
        ));
        execute(Profile::Inventory, &path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("profile: inventory"));
    }
}
