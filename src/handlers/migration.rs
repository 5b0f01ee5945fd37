use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::handlers::{parse_id, AppState};
use crate::metrics;
use crate::pricing::{validate_volume, MigrationSavings, ModelProvider, RiskScenario};
use crate::roi::{MigrationRequest, RoiResult, SensitivityReport};

/// Parameters shared by /api/migration and /api/migration/sensitivity, sent
/// as a JSON body or as a query string.
///
/// Omitted parameters fall back to the configured ROI assumptions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationBody {
    #[serde(alias = "from_framework", alias = "from")]
    pub from_framework: String,
    #[serde(alias = "to_framework", alias = "to")]
    pub to_framework: String,
    pub model: String,
    #[serde(alias = "requests_per_month", alias = "requestsPerMonth")]
    pub requests: i64,
    #[serde(default, alias = "team_size")]
    pub team_size: Option<u32>,
    #[serde(default, alias = "timeline_months")]
    pub timeline_months: Option<u32>,
    #[serde(default, alias = "horizon_months")]
    pub horizon_months: Option<u32>,
    #[serde(default, alias = "complexity_factor")]
    pub complexity_factor: Option<f64>,
    #[serde(default, alias = "risk_scenario")]
    pub risk_scenario: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsBody {
    #[serde(alias = "from_framework", alias = "from")]
    pub from_framework: String,
    #[serde(alias = "to_framework", alias = "to")]
    pub to_framework: String,
    pub model: String,
    #[serde(alias = "requests_per_month", alias = "requestsPerMonth")]
    pub requests: i64,
}

impl MigrationBody {
    fn into_request(self, state: &AppState) -> Result<MigrationRequest, AppError> {
        let assumptions = state.analyzer.assumptions();

        let mut request = MigrationRequest::with_defaults(
            assumptions,
            parse_id(&self.from_framework)?,
            parse_id(&self.to_framework)?,
            parse_id(&self.model)?,
            validate_volume(self.requests)?,
        );

        if let Some(team_size) = self.team_size {
            request.team_size = team_size;
        }
        if let Some(timeline) = self.timeline_months {
            request.timeline_months = timeline;
        }
        if let Some(horizon) = self.horizon_months {
            request.horizon_months = horizon;
        }
        if let Some(complexity) = self.complexity_factor {
            request.complexity_factor = complexity;
        }
        if let Some(risk) = self.risk_scenario.as_deref() {
            request.risk_scenario = parse_id::<RiskScenario>(risk)?;
        }

        Ok(request)
    }
}

/// Handle POST /api/migration
pub async fn migration(
    State(state): State<AppState>,
    payload: Result<Json<MigrationBody>, JsonRejection>,
) -> Result<Json<RoiResult>, AppError> {
    let Json(body) = payload?;
    analyze(&state, body).map(Json)
}

/// Handle GET /api/migration?from=..&to=..&model=..&requests=..
pub async fn migration_query(
    State(state): State<AppState>,
    query: Result<Query<MigrationBody>, QueryRejection>,
) -> Result<Json<RoiResult>, AppError> {
    let Query(body) = query?;
    analyze(&state, body).map(Json)
}

fn analyze(state: &AppState, body: MigrationBody) -> Result<RoiResult, AppError> {
    let request = body.into_request(state)?;

    let result = state.analyzer.analyze_migration(&request)?;

    metrics::record_calculation("migration", request.model.id());
    info!(
        from = %request.from_framework,
        to = %request.to_framework,
        npv = result.roi_metrics.npv,
        payback_months = ?result.roi_metrics.payback_period_months,
        "Migration analyzed"
    );

    Ok(result)
}

/// Handle /api/migration/sensitivity endpoint
pub async fn sensitivity(
    State(state): State<AppState>,
    payload: Result<Json<MigrationBody>, JsonRejection>,
) -> Result<Json<SensitivityReport>, AppError> {
    let Json(body) = payload?;
    let request = body.into_request(&state)?;

    let report = state.analyzer.sensitivity_analysis(&request)?;

    metrics::record_calculation("sensitivity", request.model.id());
    info!(
        from = %request.from_framework,
        to = %request.to_framework,
        best_npv = report.range.best_npv,
        worst_npv = report.range.worst_npv,
        "Sensitivity analysis completed"
    );

    Ok(Json(report))
}

/// Handle POST /api/savings
pub async fn savings(
    State(state): State<AppState>,
    payload: Result<Json<SavingsBody>, JsonRejection>,
) -> Result<Json<MigrationSavings>, AppError> {
    let Json(body) = payload?;
    monthly_savings(&state, body).map(Json)
}

/// Handle GET /api/savings?from=..&to=..&model=..&requests=..
pub async fn savings_query(
    State(state): State<AppState>,
    query: Result<Query<SavingsBody>, QueryRejection>,
) -> Result<Json<MigrationSavings>, AppError> {
    let Query(body) = query?;
    monthly_savings(&state, body).map(Json)
}

fn monthly_savings(state: &AppState, body: SavingsBody) -> Result<MigrationSavings, AppError> {
    let model: ModelProvider = parse_id(&body.model)?;
    let savings = state.calculator().estimate_migration_savings(
        parse_id(&body.from_framework)?,
        parse_id(&body.to_framework)?,
        model,
        validate_volume(body.requests)?,
    )?;

    metrics::record_calculation("savings", model.id());

    Ok(savings)
}
