use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::handlers::{parse_id, AppState};
use crate::metrics;
use crate::pricing::{validate_tokens, validate_volume, CostBreakdown, Framework, ModelProvider};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub framework: String,
    pub model: String,
    #[serde(alias = "requests_per_month", alias = "requestsPerMonth")]
    pub requests: i64,
    #[serde(default, alias = "custom_tokens", alias = "customTokens")]
    pub tokens: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub model: String,
    #[serde(alias = "requests_per_month", alias = "requestsPerMonth")]
    pub requests: i64,
    #[serde(default, alias = "custom_tokens", alias = "customTokens")]
    pub tokens: Option<i64>,
}

/// One row of a comparison, with the framework's display metadata
#[derive(Debug, Serialize)]
pub struct ComparisonEntry {
    pub rank: usize,
    pub framework_name: &'static str,
    pub description: String,
    #[serde(flatten)]
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub model: ModelProvider,
    pub requests: u64,
    pub results: Vec<ComparisonEntry>,
}

/// Handle POST /api/calculate
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CostBreakdown>, AppError> {
    let Json(request) = payload?;
    monthly_cost(&state, request).map(Json)
}

/// Handle GET /api/calculate?framework=..&model=..&requests=..[&tokens=..]
pub async fn calculate_query(
    State(state): State<AppState>,
    query: Result<Query<CalculateRequest>, QueryRejection>,
) -> Result<Json<CostBreakdown>, AppError> {
    let Query(request) = query?;
    monthly_cost(&state, request).map(Json)
}

/// Handle POST /api/compare
pub async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, AppError> {
    let Json(request) = payload?;
    ranked_comparison(&state, request).map(Json)
}

/// Handle GET /api/compare?model=..&requests=..[&tokens=..]
pub async fn compare_query(
    State(state): State<AppState>,
    query: Result<Query<CompareRequest>, QueryRejection>,
) -> Result<Json<CompareResponse>, AppError> {
    let Query(request) = query?;
    ranked_comparison(&state, request).map(Json)
}

fn monthly_cost(state: &AppState, request: CalculateRequest) -> Result<CostBreakdown, AppError> {
    let framework: Framework = parse_id(&request.framework)?;
    let model: ModelProvider = parse_id(&request.model)?;
    let requests = validate_volume(request.requests)?;
    let tokens = validate_tokens(request.tokens)?;

    let breakdown = state
        .calculator()
        .calculate_monthly_cost(framework, model, requests, tokens)?;

    metrics::record_calculation("calculate", model.id());
    info!(
        framework = %framework,
        model = %model,
        requests,
        total_cost = breakdown.total_cost,
        "Monthly cost calculated"
    );

    Ok(breakdown)
}

fn ranked_comparison(state: &AppState, request: CompareRequest) -> Result<CompareResponse, AppError> {
    let model: ModelProvider = parse_id(&request.model)?;
    let requests = validate_volume(request.requests)?;
    let tokens = validate_tokens(request.tokens)?;

    let calculator = state.calculator();
    let breakdowns = calculator.compare_frameworks(model, requests, tokens)?;

    let results = breakdowns
        .into_iter()
        .enumerate()
        .map(|(idx, breakdown)| -> Result<ComparisonEntry, AppError> {
            let description = calculator.tables().framework(breakdown.framework)?.description.clone();
            Ok(ComparisonEntry {
                rank: idx + 1,
                framework_name: breakdown.framework.display_name(),
                description,
                breakdown,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    metrics::record_calculation("compare", model.id());
    info!(model = %model, requests, "Frameworks compared");

    Ok(CompareResponse {
        model,
        requests,
        results,
    })
}
