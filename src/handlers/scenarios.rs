use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::error::{AppError, CalcError};
use crate::handlers::AppState;
use crate::metrics;
use crate::scenarios::{AllScenarios, ScenarioAnalysis, ScenarioGenerator};

/// Handle /api/scenarios endpoint
pub async fn list_scenarios(State(state): State<AppState>) -> Result<Json<AllScenarios>, AppError> {
    let generator = ScenarioGenerator::new(state.calculator(), state.analyzer.assumptions());
    let all = generator.analyze_all()?;

    metrics::record_calculation("scenarios", "all");
    info!(scenarios = all.scenarios.len(), "Scenario analyses generated");

    Ok(Json(all))
}

/// Handle /api/scenarios/:key endpoint
pub async fn get_scenario(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ScenarioAnalysis>, AppError> {
    let generator = ScenarioGenerator::new(state.calculator(), state.analyzer.assumptions());

    let analysis = generator.analyze_scenario(&key).map_err(|e| match e {
        CalcError::InvalidInput(msg) => AppError::NotFound(msg),
        other => other.into(),
    })?;

    metrics::record_calculation("scenario", analysis.scenario.model.id());

    Ok(Json(analysis))
}
