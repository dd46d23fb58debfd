use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::error::{error_response, RecipeError};
use crate::food::extractor::extract;
use crate::food::types::{IngredientSet, Preferences};
use crate::food::RecipeOrchestrator;
use crate::scanner::{scan_client, ScanError, ScanSource, SCAN_REQUEST_TIMEOUT};

/// Whether each external service has usable credentials.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceStatus {
    pub nutritionix: bool,
    pub nebius: bool,
}

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<RecipeOrchestrator>,
    services: ServiceStatus,
    scan_source: ScanSource,
    http: Client,
}

impl AppState {
    pub fn new(
        orchestrator: RecipeOrchestrator,
        services: ServiceStatus,
        scan_source: ScanSource,
    ) -> Result<Self, ScanError> {
        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            services,
            scan_source,
            http: scan_client(SCAN_REQUEST_TIMEOUT)?,
        })
    }
}

#[derive(Deserialize)]
pub struct NutritionRequest {
    items: Vec<String>,
}

#[derive(Deserialize, Validate)]
pub struct GenerateRecipesRequest {
    #[validate(length(min = 1, message = "Please add at least one ingredient"))]
    items: Vec<String>,
    #[serde(default)]
    preferences: Option<Preferences>,
}

#[derive(Deserialize, Validate)]
pub struct ExtractRequest {
    #[validate(length(max = 20000))]
    text: String,
}

#[derive(Serialize)]
struct IngredientsResponse {
    ingredients: IngredientSet,
    timestamp: String,
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Bad JSON and wrong field types are the caller's fault, not ours.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RecipeError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| RecipeError::Validation(rejection.body_text()))
}

/// Create and configure the API router
pub fn create_api(state: AppState) -> Router {
    log::info!("Setting up API server with CORS...");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/api/nutrition", post(nutrition_handler))
        .route("/api/generate-recipes", post(generate_recipes_handler))
        .route("/api/extract", post(extract_handler))
        .route("/api/scan", get(scan_handler))
        .route("/api/scan/ingredients", get(scan_ingredients_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

async fn nutrition_handler(
    State(state): State<AppState>,
    payload: Result<Json<NutritionRequest>, JsonRejection>,
) -> Result<Response, RecipeError> {
    let request = body(payload)?;
    let nutrition_data = state.orchestrator.nutrition(&request.items).await?;
    Ok(Json(json!({ "nutritionData": nutrition_data })).into_response())
}

async fn generate_recipes_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRecipesRequest>, JsonRejection>,
) -> Result<Response, RecipeError> {
    let request = body(payload)?;
    request
        .validate()
        .map_err(|e| RecipeError::Validation(e.to_string()))?;

    let items: IngredientSet = request.items.into_iter().collect();
    let preferences = request.preferences.unwrap_or_default().normalized();

    let result = state.orchestrator.generate(&items, &preferences).await?;

    Ok(Json(json!({
        "success": true,
        "data": result,
        "timestamp": timestamp(),
    }))
    .into_response())
}

async fn extract_handler(payload: Result<Json<ExtractRequest>, JsonRejection>) -> Result<Response, RecipeError> {
    let request = body(payload)?;
    request
        .validate()
        .map_err(|e| RecipeError::Validation(e.to_string()))?;

    Ok(Json(IngredientsResponse {
        ingredients: extract(&request.text),
        timestamp: timestamp(),
    })
    .into_response())
}

fn scan_error(err: ScanError) -> Response {
    match err {
        ScanError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "scan_not_found", &err.to_string()),
        ScanError::Json(_) => error_response(StatusCode::BAD_GATEWAY, "scan_invalid", &err.to_string()),
        _ => error_response(StatusCode::BAD_GATEWAY, "scan_unavailable", &err.to_string()),
    }
}

/// Serves the capture device's latest artifact byte-for-byte.
async fn scan_handler(State(state): State<AppState>) -> Response {
    match state.scan_source.read_raw(&state.http).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            log::warn!("Scan passthrough failed: {}", e);
            scan_error(e)
        }
    }
}

async fn scan_ingredients_handler(State(state): State<AppState>) -> Response {
    match state.scan_source.read_artifact(&state.http).await {
        Ok(artifact) => Json(IngredientsResponse {
            ingredients: artifact.ingredients(),
            timestamp: timestamp(),
        })
        .into_response(),
        Err(e) => scan_error(e),
    }
}

async fn health_check(State(state): State<AppState>) -> Response {
    log::debug!("Health check requested");
    Json(json!({
        "status": "healthy",
        "config": {
            "nutritionix": { "configured": state.services.nutritionix },
            "nebius": { "configured": state.services.nebius },
        },
        "timestamp": timestamp(),
    }))
    .into_response()
}
