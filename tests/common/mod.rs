// Shared stubs for the integration tests. Not every test binary uses every item.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use rust_recipe_agent::api::{create_api, AppState, ServiceStatus};
use rust_recipe_agent::food::api::NutritionProvider;
use rust_recipe_agent::food::types::NutritionRecord;
use rust_recipe_agent::providers::traits::CompletionProvider;
use rust_recipe_agent::scanner::ScanSource;
use rust_recipe_agent::{RecipeOrchestrator, ServiceError};

pub const RECIPE_JSON: &str = r#"{"name":"Vegetable Egg Fried Rice","ingredients":["2 eggs","1 cup rice"],"instructions":["Cook the rice","Scramble the eggs","Fry together"],"nutritionEstimate":{"calories":"520","protein":"18g","carbs":"70g","fat":"16g"}}"#;

#[derive(Default)]
pub struct FakeNutrition {
    pub calls: AtomicUsize,
    pub failing: HashSet<String>,
    pub delay: Option<Duration>,
}

#[async_trait]
impl NutritionProvider for FakeNutrition {
    async fn lookup(&self, item: &str) -> Result<NutritionRecord, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(item) {
            return Err(ServiceError::Status {
                service: "fake-nutrition",
                status: 503,
                detail: "unavailable".to_string(),
            });
        }
        Ok(NutritionRecord {
            name: item.to_string(),
            calories: Some(70.0),
            protein: Some(6.0),
            carbs: Some(1.0),
            fat: Some(5.0),
        })
    }

    fn name(&self) -> &'static str {
        "fake-nutrition"
    }
}

#[derive(Clone)]
pub struct FakeGenerator {
    pub calls: Arc<AtomicUsize>,
    pub reply: Result<String, ServiceError>,
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Ok(reply.to_string()),
        }
    }
}

#[async_trait]
impl CompletionProvider for FakeGenerator {
    async fn complete(&self, _system_message: &str, _prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn name(&self) -> &'static str {
        "fake-generator"
    }

    fn get_model_info(&self) -> String {
        "fake".to_string()
    }
}

pub fn app_with(orchestrator: RecipeOrchestrator, scan_source: ScanSource) -> Router {
    let services = ServiceStatus {
        nutritionix: true,
        nebius: true,
    };
    create_api(AppState::new(orchestrator, services, scan_source).expect("Failed to build app state"))
}

pub fn missing_scan() -> ScanSource {
    ScanSource::File(std::env::temp_dir().join(format!("missing-scan-{}.json", uuid::Uuid::new_v4())))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(Body::from(body.unwrap_or_default().to_string()))
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Failed to execute request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec();
    (status, bytes)
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let json = serde_json::from_slice(&bytes).expect("Failed to deserialize JSON response");
    (status, json)
}
