use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::Cell;
use std::path::Path;
use tracing::info;

use agent_cost::config::Config;
use agent_cost::scenarios::{ScenarioAnalysis, ScenarioGenerator, SCENARIOS};

use super::{format_usd, format_volume, print_json, table};

/// Execute the scenarios command
///
/// Without a key every scenario is analyzed and summarized.
pub fn execute(cfg: &Config, key: Option<&str>, output: Option<&Path>, json: bool) -> Result<()> {
    let calculator = super::calculator(cfg);
    let generator = ScenarioGenerator::new(&calculator, &cfg.roi);

    match key {
        Some(key) => {
            let analysis = generator.analyze_scenario(key)?;
            if let Some(path) = output {
                write_json(path, &analysis)?;
            }
            if json {
                return print_json(&analysis);
            }
            print_analysis(&analysis);
        }
        None => {
            println!("{}", format!("Analyzing {} business scenarios...", SCENARIOS.len()).yellow());
            let all = generator.analyze_all()?;
            if let Some(path) = output {
                write_json(path, &all)?;
            }
            if json {
                return print_json(&all);
            }

            for analysis in &all.scenarios {
                print_analysis(analysis);
                println!();
            }

            println!("{}", "Summary".green().bold());
            let mut wins = table(&["FRAMEWORK", "WINS", "WIN RATE"]);
            for (framework, record) in &all.summary.framework_performance {
                wins.add_row(vec![
                    Cell::new(framework.display_name()),
                    Cell::new(record.wins),
                    Cell::new(format!("{:.0}%", record.win_rate * 100.0)),
                ]);
            }
            println!("{}", wins);
            for insight in &all.summary.key_insights {
                println!("  {} {}", "→".cyan(), insight);
            }
        }
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write analysis to {}", path.display()))?;

    info!(path = %path.display(), "Scenario analysis written");
    println!("{} {}", "✓ Analysis saved to".green(), path.display());
    Ok(())
}

fn print_analysis(analysis: &ScenarioAnalysis) {
    let scenario = &analysis.scenario;
    let summary = &analysis.cost_summary;

    println!(
        "{} {}",
        scenario.name.green().bold(),
        format!("({})", scenario.key).dimmed()
    );
    println!("  {}", scenario.description);
    println!(
        "  {} requests/month on {}, {} tokens/request",
        format_volume(scenario.requests_per_month),
        scenario.model.display_name(),
        scenario.custom_tokens
    );
    println!(
        "  Best: {} at {}/month; up to {}/year ({:.1}%) saved vs {}",
        summary.best_option.display_name().bold(),
        format_usd(summary.best_monthly_cost),
        format_usd(summary.max_annual_savings),
        summary.savings_percentage,
        summary.most_expensive.display_name()
    );

    let mut tco = table(&["FRAMEWORK", "MONTHLY", "DEVELOPMENT", "FIRST YEAR", "VS BEST/YR", "3-YEAR TCO"]);
    for (entry, breakdown) in analysis.tco.iter().zip(&analysis.framework_comparison) {
        tco.add_row(vec![
            Cell::new(entry.framework_name),
            Cell::new(format_usd(breakdown.total_cost)),
            Cell::new(format_usd(entry.development_cost)),
            Cell::new(format_usd(entry.total_first_year_cost)),
            Cell::new(format_usd(entry.annual_cost_vs_best)),
            Cell::new(format_usd(entry.three_year_tco)),
        ]);
    }
    println!("{}", tco);

    for rec in &analysis.recommendations {
        println!(
            "  {} {}: {}",
            "→".cyan(),
            rec.category.bold(),
            rec.reasoning
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scenario_fails() {
        let result = execute(&Config::default(), Some("moon_base"), None, true);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_file_written() {
        let path = std::env::temp_dir().join(format!("agent-cost-scenario-{}.json", std::process::id()));

        execute(&Config::default(), Some("saas_growth"), Some(&path), true).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["scenario"]["key"], "saas_growth");

        std::fs::remove_file(&path).ok();
    }
}
