use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use serde::Serialize;
use tracing::info;

use agent_cost::config::Config;
use agent_cost::pricing::{
    validate_tokens, validate_volume, CostBreakdown, CostCalculator, Framework, ModelProvider,
};

use super::{format_usd, format_volume, print_json, table};

/// Execute the calculate command
pub fn calculate(
    cfg: &Config,
    framework: &str,
    model: &str,
    requests: i64,
    tokens: Option<i64>,
    json: bool,
) -> Result<()> {
    let framework: Framework = framework.parse()?;
    let model: ModelProvider = model.parse()?;
    let requests = validate_volume(requests)?;
    let tokens = validate_tokens(tokens)?;

    let calculator = super::calculator(cfg);
    let breakdown = calculator.calculate_monthly_cost(framework, model, requests, tokens)?;
    info!(framework = %framework, model = %model, requests, "Monthly cost calculated");

    if json {
        return print_json(&breakdown);
    }

    println!(
        "{} {} on {} at {} requests/month",
        "Monthly cost:".green().bold(),
        framework.display_name().bold(),
        model.display_name(),
        format_volume(requests)
    );
    println!();
    println!("  Tokens/request:   {}", breakdown.tokens_per_request);
    println!("  API cost:         {}", format_usd(breakdown.api_cost));
    println!("  Infrastructure:   {}", format_usd(breakdown.infrastructure_cost));
    println!("  Monitoring:       {}", format_usd(breakdown.monitoring_cost));
    println!("  {}", format!("Total:            {}", format_usd(breakdown.total_cost)).bold());
    println!("  Cost/request:     ${:.4}", breakdown.cost_per_request);

    Ok(())
}

#[derive(Serialize)]
struct ComparisonOutput<'a> {
    model: ModelProvider,
    requests: u64,
    results: &'a [CostBreakdown],
}

/// Execute the compare command
pub fn compare(cfg: &Config, model: &str, requests: i64, tokens: Option<i64>, json: bool) -> Result<()> {
    let model: ModelProvider = model.parse()?;
    let requests = validate_volume(requests)?;
    let tokens = validate_tokens(tokens)?;

    let calculator = super::calculator(cfg);
    let results = calculator.compare_frameworks(model, requests, tokens)?;
    info!(model = %model, requests, "Frameworks compared");

    if json {
        return print_json(&ComparisonOutput {
            model,
            requests,
            results: &results,
        });
    }

    println!(
        "{} {} at {} requests/month",
        "Framework comparison:".green().bold(),
        model.display_name(),
        format_volume(requests)
    );
    println!("{}", comparison_table(&calculator, &results));

    if let (Some(best), Some(worst)) = (results.first(), results.last()) {
        let savings = worst.total_cost - best.total_cost;
        println!(
            "{} {} saves {}/month ({}/year) over {}",
            "→".cyan(),
            best.framework.display_name().bold(),
            format_usd(savings),
            format_usd(savings * 12.0),
            worst.framework.display_name()
        );
    }

    Ok(())
}

pub(crate) fn comparison_table(calculator: &CostCalculator, results: &[CostBreakdown]) -> comfy_table::Table {
    let mut table = table(&[
        "RANK", "FRAMEWORK", "DESCRIPTION", "TOKENS", "API", "INFRA", "MONITORING", "TOTAL",
    ]);

    for (idx, breakdown) in results.iter().enumerate() {
        let description = calculator
            .tables()
            .framework(breakdown.framework)
            .map(|p| p.description.clone())
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(breakdown.framework.display_name()),
            Cell::new(description),
            Cell::new(breakdown.tokens_per_request),
            Cell::new(format_usd(breakdown.api_cost)),
            Cell::new(format_usd(breakdown.infrastructure_cost)),
            Cell::new(format_usd(breakdown.monitoring_cost)),
            Cell::new(format_usd(breakdown.total_cost)),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_rejects_non_positive_tokens() {
        let err = calculate(&Config::default(), "autogen", "openai_gpt4o", 100, Some(-1), true)
            .unwrap_err();
        // same wording as the HTTP API
        assert_eq!(
            err.to_string(),
            "Invalid input: custom token count must be positive, got -1"
        );

        assert!(compare(&Config::default(), "openai_gpt4o", 100, Some(0), true).is_err());
    }

    #[test]
    fn test_calculate_rejects_unknown_model() {
        let result = calculate(&Config::default(), "autogen", "gpt-9", 100, None, true);
        assert!(result.is_err());
    }

    #[test]
    fn test_comparison_table_has_every_framework() {
        let calculator = CostCalculator::default();
        let results = calculator
            .compare_frameworks(ModelProvider::OpenAiGpt4o, 10_000, None)
            .unwrap();

        let rendered = comparison_table(&calculator, &results).to_string();
        for fw in Framework::ALL {
            assert!(rendered.contains(fw.display_name()));
        }
    }
}
