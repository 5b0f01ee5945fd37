use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::pricing::{framework_catalog, model_catalog, FrameworkInfo, ModelInfo};

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
pub struct FrameworksResponse {
    pub frameworks: Vec<FrameworkInfo>,
}

/// Handle /api/models endpoint
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, AppError> {
    let models = model_catalog(state.calculator().tables())?;
    Ok(Json(ModelsResponse { models }))
}

/// Handle /api/frameworks endpoint
pub async fn list_frameworks(
    State(state): State<AppState>,
) -> Result<Json<FrameworksResponse>, AppError> {
    let frameworks = framework_catalog(state.calculator().tables(), state.analyzer.assumptions())?;
    Ok(Json(FrameworksResponse { frameworks }))
}
