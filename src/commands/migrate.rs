use anyhow::Result;
use colored::{ColoredString, Colorize};
use comfy_table::Cell;
use tracing::info;

use agent_cost::config::Config;
use agent_cost::pricing::{validate_volume, RiskScenario};
use agent_cost::roi::{
    MigrationRequest, RecommendationLevel, RoiAnalyzer, RoiResult, SensitivityPoint,
    SensitivityReport,
};

use crate::cli::MigrateArgs;

use super::{format_usd, print_json, table};

/// Months of the cash-flow projection shown in text mode
const CASH_FLOW_PREVIEW_MONTHS: usize = 12;

/// Build a migration request from CLI arguments, defaults from config
pub fn build_request(analyzer: &RoiAnalyzer, args: &MigrateArgs) -> Result<MigrationRequest> {
    let mut request = MigrationRequest::with_defaults(
        analyzer.assumptions(),
        args.from.parse()?,
        args.to.parse()?,
        args.model.parse()?,
        validate_volume(args.requests)?,
    );

    if let Some(team_size) = args.team_size {
        request.team_size = team_size;
    }
    if let Some(timeline) = args.timeline {
        request.timeline_months = timeline;
    }
    if let Some(horizon) = args.horizon {
        request.horizon_months = horizon;
    }
    if let Some(complexity) = args.complexity {
        request.complexity_factor = complexity;
    }
    if let Some(risk) = &args.risk {
        request.risk_scenario = risk.parse::<RiskScenario>()?;
    }

    Ok(request)
}

/// Execute the migrate command
pub fn migrate(cfg: &Config, args: &MigrateArgs, json: bool) -> Result<()> {
    let analyzer = super::analyzer(cfg);
    let request = build_request(&analyzer, args)?;

    let result = analyzer.analyze_migration(&request)?;
    info!(
        from = %request.from_framework,
        to = %request.to_framework,
        npv = result.roi_metrics.npv,
        "Migration analyzed"
    );

    if json {
        return print_json(&result);
    }

    print_report(&request, &result, analyzer.assumptions().discount_rate);
    Ok(())
}

fn print_report(request: &MigrationRequest, result: &RoiResult, discount_rate: f64) {
    let costs = &result.cost_analysis;
    let metrics = &result.roi_metrics;

    println!(
        "{} {} → {} ({}, {} requests/month, {} risk)",
        "Migration ROI:".green().bold(),
        request.from_framework.display_name().bold(),
        request.to_framework.display_name().bold(),
        request.model.display_name(),
        request.requests_per_month,
        request.risk_scenario
    );
    println!();

    println!("{}", "Costs".bold());
    println!("  Current monthly:  {}", format_usd(costs.current_monthly_cost));
    println!("  Target monthly:   {}", format_usd(costs.target_monthly_cost));
    println!(
        "  Monthly savings:  {} ({:.1}%)",
        signed_usd(costs.monthly_savings),
        costs.savings_percentage
    );
    println!("  Annual savings:   {}", signed_usd(costs.annual_savings));
    println!(
        "  Migration cost:   {} (risk factor {:.1}x)",
        format_usd(costs.development_cost),
        costs.risk_factor
    );
    println!();

    println!(
        "{} ({} months, {:.1}% annual discount)",
        "ROI".bold(),
        result.migration_summary.analysis_period_months,
        discount_rate * 100.0
    );
    println!("  NPV:              {}", signed_usd(metrics.npv));
    println!("  Payback:          {}", payback_text(metrics.payback_period_months));
    match metrics.simple_payback_months {
        Some(months) => println!("  Simple payback:   {:.1} months", months),
        None => println!("  Simple payback:   {}", "never".red()),
    }
    println!("  ROI:              {:.1}%", metrics.roi_percentage);
    println!("  Total savings:    {}", signed_usd(metrics.total_savings));
    println!();

    let mut cash_flow = table(&["MONTH", "DESCRIPTION", "CASH FLOW", "CUMULATIVE", "CUMULATIVE (DISC.)"]);
    for entry in result
        .cash_flow_projection
        .iter()
        .take(CASH_FLOW_PREVIEW_MONTHS + 1)
    {
        cash_flow.add_row(vec![
            Cell::new(entry.month),
            Cell::new(&entry.description),
            Cell::new(format_usd(entry.cash_flow)),
            Cell::new(format_usd(entry.cumulative_cash_flow)),
            Cell::new(format_usd(entry.cumulative_discounted_cash_flow)),
        ]);
    }
    println!("{}", cash_flow);

    if !result.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".bold());
        for rec in &result.recommendations {
            println!("  {} [{}] {}", level_marker(rec.level), rec.category, rec.message);
            println!("      {}", rec.action.dimmed());
        }
    }
}

/// Execute the sensitivity command
pub fn sensitivity(cfg: &Config, args: &MigrateArgs, json: bool) -> Result<()> {
    let analyzer = super::analyzer(cfg);
    let request = build_request(&analyzer, args)?;

    let report = analyzer.sensitivity_analysis(&request)?;
    info!(
        from = %request.from_framework,
        to = %request.to_framework,
        points = report.grid.len(),
        "Sensitivity analysis completed"
    );

    if json {
        return print_json(&report);
    }

    print_sensitivity(&request, &report);
    Ok(())
}

fn print_sensitivity(request: &MigrationRequest, report: &SensitivityReport) {
    println!(
        "{} {} → {}",
        "Sensitivity analysis:".green().bold(),
        request.from_framework.display_name().bold(),
        request.to_framework.display_name().bold()
    );
    println!();

    println!("{}", "Volume (complexity at baseline)".bold());
    println!("{}", sensitivity_table("VOLUME", &report.volume_sensitivity, |p| p.volume_multiplier));
    println!();

    println!("{}", "Complexity (volume at baseline)".bold());
    println!(
        "{}",
        sensitivity_table("COMPLEXITY", &report.complexity_sensitivity, |p| p.complexity_multiplier)
    );
    println!();

    let range = &report.range;
    println!("{}", "Range".bold());
    println!(
        "  Best case:   NPV {} (volume {:.1}x, complexity {:.1}x)",
        signed_usd(range.best_npv),
        range.best_case.volume_multiplier,
        range.best_case.complexity_multiplier
    );
    println!(
        "  Worst case:  NPV {} (volume {:.1}x, complexity {:.1}x)",
        signed_usd(range.worst_npv),
        range.worst_case.volume_multiplier,
        range.worst_case.complexity_multiplier
    );
    println!("  Payback:     {} to {}", payback_text(range.best_payback_months), payback_text(range.worst_payback_months));
}

fn sensitivity_table(
    label: &str,
    points: &[SensitivityPoint],
    multiplier: impl Fn(&SensitivityPoint) -> f64,
) -> comfy_table::Table {
    let mut table = table(&[label, "REQUESTS", "SAVINGS/MO", "MIGRATION COST", "NPV", "PAYBACK", "ROI"]);
    for point in points {
        table.add_row(vec![
            Cell::new(format!("{:.1}x", multiplier(point))),
            Cell::new(point.requests_per_month),
            Cell::new(format_usd(point.monthly_savings)),
            Cell::new(format_usd(point.development_cost)),
            Cell::new(format_usd(point.npv)),
            Cell::new(payback_text(point.payback_period_months)),
            Cell::new(format!("{:.1}%", point.roi_percentage)),
        ]);
    }
    table
}

fn payback_text(months: Option<u32>) -> String {
    match months {
        Some(m) => format!("{} months", m),
        None => "no payback within horizon".to_string(),
    }
}

fn signed_usd(amount: f64) -> ColoredString {
    if amount < 0.0 {
        format_usd(amount).red()
    } else {
        format_usd(amount).green()
    }
}

fn level_marker(level: RecommendationLevel) -> ColoredString {
    match level {
        RecommendationLevel::Positive => "✓".green(),
        RecommendationLevel::Neutral => "•".yellow(),
        RecommendationLevel::Cautionary => "!".yellow().bold(),
        RecommendationLevel::High => "✗".red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(from: &str, to: &str) -> MigrateArgs {
        MigrateArgs {
            from: from.to_string(),
            to: to.to_string(),
            model: "openai_gpt4o".to_string(),
            requests: 10_000,
            team_size: None,
            timeline: None,
            horizon: None,
            complexity: None,
            risk: None,
        }
    }

    #[test]
    fn test_build_request_defaults() {
        let analyzer = RoiAnalyzer::default();
        let request = build_request(&analyzer, &args("langgraph", "semantic_kernel")).unwrap();

        assert_eq!(request.team_size, 5);
        assert_eq!(request.horizon_months, 36);
        assert_eq!(request.risk_scenario, RiskScenario::Growth);
    }

    #[test]
    fn test_build_request_rejects_negative_volume() {
        let analyzer = RoiAnalyzer::default();
        let mut bad = args("autogen", "crewai");
        bad.requests = -5;

        assert!(build_request(&analyzer, &bad).is_err());
    }

    #[test]
    fn test_payback_text() {
        assert_eq!(payback_text(Some(14)), "14 months");
        assert_eq!(payback_text(None), "no payback within horizon");
    }

    #[test]
    fn test_migrate_runs_in_json_mode() {
        assert!(migrate(&Config::default(), &args("langgraph", "semantic_kernel"), true).is_ok());
        assert!(sensitivity(&Config::default(), &args("langgraph", "semantic_kernel"), true).is_ok());
    }
}
