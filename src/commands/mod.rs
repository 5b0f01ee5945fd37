//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - serve: Start the HTTP API server
//! - calculate / compare: Monthly cost of frameworks
//! - migrate / sensitivity: Migration ROI analysis
//! - scenarios: Predefined business scenario analyses
//! - catalog: Model and framework listings
//! - config: Configuration display and validation

pub mod calculate;
pub mod catalog;
pub mod config;
pub mod migrate;
pub mod scenarios;
pub mod serve;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::sync::Arc;

use agent_cost::config::Config;
use agent_cost::pricing::CostCalculator;
use agent_cost::roi::RoiAnalyzer;

pub fn calculator(cfg: &Config) -> CostCalculator {
    CostCalculator::new(Arc::new(cfg.pricing.clone()))
}

/// Analyzer over the configured tables
pub fn analyzer(cfg: &Config) -> RoiAnalyzer {
    RoiAnalyzer::new(calculator(cfg), Arc::new(cfg.roi.clone()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Table with the house style and a cyan header row
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

/// Dollar amount with thousands separators, e.g. `-$1,234.50`
pub fn format_usd(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", amount.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, frac)
}

/// Compact request volume, e.g. `25.0K`
pub fn format_volume(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
