use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::{error, info};

use agent_cost::config::{self, Config};

/// Execute the config show command
///
/// Displays the effective configuration: file values, environment
/// overrides and built-in defaults merged together
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying effective configuration");

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
///
/// Loads the configuration itself so that load errors are reported here
/// rather than aborting startup
pub fn validate(path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!(path = %path.display(), "Validating configuration file");

    if !path.exists() {
        println!(
            "{}",
            format!("  {} not found, built-in defaults apply", path.display()).dimmed()
        );
    }

    let cfg = match config::load_config(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration validation failed: {:#}", e);
            println!("{} {:#}", "✗ Configuration is invalid:".red().bold(), e);
            return Err(e);
        }
    };

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Listen: {}:{}", cfg.server.host, cfg.server.port);
    println!("  Models: {}", cfg.pricing.models.len());
    println!("  Frameworks: {}", cfg.pricing.frameworks.len());
    println!(
        "  Volume tiers: {} infrastructure, {} monitoring",
        cfg.pricing.infrastructure_tiers.len(),
        cfg.pricing.monitoring_tiers.len()
    );
    println!(
        "  Discount rate: {:.1}% over {} months by default",
        cfg.roi.discount_rate * 100.0,
        cfg.roi.default_horizon_months
    );

    info!("Configuration validation successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_default_config_serializes() {
        assert!(show(&Config::default()).is_ok());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.pricing, cfg.pricing);
        assert_eq!(parsed.roi, cfg.roi);
    }

    #[test]
    fn test_validate_reports_invalid_file() {
        let dir = std::env::temp_dir().join(format!("agent-cost-validate-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[server]\nlog_format = \"xml\"\n").unwrap();

        assert!(validate(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
