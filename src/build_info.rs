//! Build metadata and the startup banner
//!
//! `build.rs` stamps each compile with a build number, a UTC timestamp and
//! the cargo profile.

use serde::Serialize;

use crate::config::Config;
use crate::nutrition::RecipeScaling;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information for status output
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: option_env!("NUTRILOG_BUILD_NUMBER")
                .and_then(|n| n.parse().ok())
                .unwrap_or(0),
            build_timestamp: option_env!("NUTRILOG_BUILD_TIMESTAMP").unwrap_or("unknown"),
            profile: option_env!("NUTRILOG_BUILD_PROFILE").unwrap_or("unknown"),
        }
    }
}

fn describe_scaling(scaling: RecipeScaling) -> &'static str {
    match scaling {
        RecipeScaling::Uniform100 => "uniform (recipe quantities / 100)",
        RecipeScaling::ByUnitKind => "unit-aware (pieces count per piece)",
    }
}

/// Banner text shown on stderr before the server starts
pub fn startup_banner(info: &BuildInfo, config: &Config) -> String {
    let rule = "=".repeat(47);
    [
        rule.clone(),
        format!("  {} {} - nutrition diary", info.name, info.version),
        format!("  Build #{} ({}) compiled {}", info.build_number, info.profile, info.build_timestamp),
        format!("  Database:       {}", config.database_path.display()),
        format!("  Recipe scaling: {}", describe_scaling(config.recipe_scaling)),
        format!("  Feed capacity:  {}", config.feed_capacity),
        rule,
    ]
    .join("\n")
}

pub fn print_startup_banner(config: &Config) {
    eprintln!("{}", startup_banner(&BuildInfo::current(), config));
}
