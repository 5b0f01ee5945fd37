//! Model and framework listings built from the loaded tables

use serde::Serialize;

use crate::error::CalcError;
use crate::pricing::models::{Framework, ModelProvider};
use crate::pricing::tables::{PricingTables, RoiAssumptions};

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub input_cost_per_1m: f64,
    pub output_cost_per_1m: f64,
    pub average_cost_per_1m: f64,
}

#[derive(Debug, Serialize)]
pub struct FrameworkInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: String,
    pub avg_tokens: u64,
    pub efficiency_score: f64,
    pub overhead_multiplier: f64,
    pub development_base_cost: f64,
}

/// Every model with its configured pricing, in enumeration order
pub fn model_catalog(tables: &PricingTables) -> Result<Vec<ModelInfo>, CalcError> {
    ModelProvider::ALL
        .into_iter()
        .map(|model| -> Result<ModelInfo, CalcError> {
            let pricing = tables.model(model)?;
            Ok(ModelInfo {
                id: model.id(),
                name: model.display_name(),
                input_cost_per_1m: pricing.input_cost,
                output_cost_per_1m: pricing.output_cost,
                average_cost_per_1m: pricing.average_cost(tables.input_token_share),
            })
        })
        .collect()
}

/// Every framework with its token profile and development baseline
pub fn framework_catalog(
    tables: &PricingTables,
    assumptions: &RoiAssumptions,
) -> Result<Vec<FrameworkInfo>, CalcError> {
    Framework::ALL
        .into_iter()
        .map(|framework| -> Result<FrameworkInfo, CalcError> {
            let profile = tables.framework(framework)?;
            Ok(FrameworkInfo {
                id: framework.id(),
                name: framework.display_name(),
                description: profile.description.clone(),
                avg_tokens: profile.avg_tokens_per_request(),
                efficiency_score: profile.efficiency_score,
                overhead_multiplier: profile.overhead_multiplier,
                development_base_cost: assumptions.development(framework)?.base_cost,
            })
        })
        .collect()
}
