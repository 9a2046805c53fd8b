//! `ledgerfab profiles` command.

use colored::Colorize;
use ledgerfab::config::{FabricConfig, Profile};

/// Execute the `profiles` command.
pub fn execute() {
    println!("{}", "Profiles:".bright_white().bold());
    for profile in Profile::ALL {
        let config = FabricConfig::for_profile(profile);
        let seed = match config.seed {
            Some(seed) => format!("seed {seed}"),
            None => "unseeded".to_string(),
        };
        println!(
            "  {:<20} {} {}",
            profile.name().bright_cyan(),
            profile.description(),
            format!("({seed}, {} to {})", config.calendar.start, config.calendar.end).dimmed()
        );
    }
}
