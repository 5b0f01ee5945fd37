use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use serde_json::json;

use agent_cost::config::Config;
use agent_cost::pricing::{framework_catalog, model_catalog};

use super::{format_usd, print_json, table};

/// Execute the models command
pub fn models(cfg: &Config, json: bool) -> Result<()> {
    let models = model_catalog(&cfg.pricing)?;

    if json {
        return print_json(&json!({ "models": models }));
    }

    println!("{}", "Models (USD per 1M tokens)".green().bold());
    let mut table = table(&["ID", "NAME", "INPUT", "OUTPUT", "BLENDED"]);
    for model in &models {
        table.add_row(vec![
            Cell::new(model.id),
            Cell::new(model.name),
            Cell::new(format_usd(model.input_cost_per_1m)),
            Cell::new(format_usd(model.output_cost_per_1m)),
            Cell::new(format!("${:.3}", model.average_cost_per_1m)),
        ]);
    }
    println!("{}", table);
    println!(
        "Blended price weights input tokens at {:.0}%",
        cfg.pricing.input_token_share * 100.0
    );

    Ok(())
}

/// Execute the frameworks command
pub fn frameworks(cfg: &Config, json: bool) -> Result<()> {
    let frameworks = framework_catalog(&cfg.pricing, &cfg.roi)?;

    if json {
        return print_json(&json!({ "frameworks": frameworks }));
    }

    println!("{}", "Frameworks".green().bold());
    let mut table = table(&[
        "ID", "NAME", "DESCRIPTION", "AVG TOKENS", "EFFICIENCY", "OVERHEAD", "DEV BASELINE",
    ]);
    for framework in &frameworks {
        table.add_row(vec![
            Cell::new(framework.id),
            Cell::new(framework.name),
            Cell::new(&framework.description),
            Cell::new(framework.avg_tokens),
            Cell::new(format!("{:.2}", framework.efficiency_score)),
            Cell::new(format!("{:.2}x", framework.overhead_multiplier)),
            Cell::new(format_usd(framework.development_base_cost)),
        ]);
    }
    println!("{}", table);

    Ok(())
}
