//! In-memory stand-ins for the external services.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ServiceError;
use crate::food::api::NutritionProvider;
use crate::food::types::NutritionRecord;
use crate::providers::traits::CompletionProvider;

pub const RECIPE_JSON: &str = r#"{"name":"Egg Fried Rice","ingredients":["egg","rice"],"instructions":["Cook","Fry"],"nutritionEstimate":{"calories":"450","protein":"15g","carbs":"60g","fat":"14g"}}"#;

#[derive(Default)]
pub struct StubNutrition {
    pub calls: AtomicUsize,
    pub failing: HashSet<String>,
    pub delay: Option<Duration>,
}

impl StubNutrition {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionProvider for StubNutrition {
    async fn lookup(&self, item: &str) -> Result<NutritionRecord, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(item) {
            return Err(ServiceError::Status {
                service: "stub-nutrition",
                status: 500,
                detail: "boom".to_string(),
            });
        }
        Ok(NutritionRecord {
            name: item.to_string(),
            calories: Some(100.0),
            protein: Some(5.0),
            carbs: Some(10.0),
            fat: Some(2.0),
        })
    }

    fn name(&self) -> &'static str {
        "stub-nutrition"
    }
}

#[derive(Clone)]
pub struct StubGenerator {
    pub calls: Arc<AtomicUsize>,
    pub reply: Result<String, ServiceError>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Ok(reply.to_string()),
        }
    }

    pub fn failing(err: ServiceError) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Err(err),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubGenerator {
    async fn complete(&self, _system_message: &str, _prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn name(&self) -> &'static str {
        "stub-generator"
    }

    fn get_model_info(&self) -> String {
        "stub".to_string()
    }
}
