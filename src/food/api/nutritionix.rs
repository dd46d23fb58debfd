use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::ServiceError;
use crate::food::api::NutritionProvider;
use crate::food::config::FoodConfig;
use crate::food::types::NutritionRecord;
use crate::providers::utils::{check_status, transport_error};

const SERVICE: &str = "nutritionix";

#[derive(Debug, Deserialize)]
struct NutrientsResponse {
    #[serde(default)]
    foods: Vec<Food>,
}

#[derive(Debug, Deserialize)]
struct Food {
    food_name: String,
    nf_calories: Option<f64>,
    nf_protein: Option<f64>,
    nf_total_carbohydrate: Option<f64>,
    nf_total_fat: Option<f64>,
}

impl From<Food> for NutritionRecord {
    fn from(food: Food) -> Self {
        Self {
            name: food.food_name,
            calories: food.nf_calories,
            protein: food.nf_protein,
            carbs: food.nf_total_carbohydrate,
            fat: food.nf_total_fat,
        }
    }
}

/// Client for the Nutritionix natural-language nutrients endpoint.
#[derive(Debug, Clone)]
pub struct NutritionixClient {
    app_id: String,
    app_key: String,
    base_url: String,
    client: Client,
}

impl NutritionixClient {
    pub fn new(config: &FoodConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| transport_error(SERVICE, e))?;

        Ok(Self {
            app_id: config.nutritionix_app_id.clone(),
            app_key: config.nutritionix_app_key.clone(),
            base_url: config.api_url.clone(),
            client,
        })
    }
}

#[async_trait]
impl NutritionProvider for NutritionixClient {
    /// Returns the macros of the first food Nutritionix matches for `item`.
    async fn lookup(&self, item: &str) -> Result<NutritionRecord, ServiceError> {
        let url = format!("{}/natural/nutrients", self.base_url);

        let response = self.client
            .post(&url)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.app_key)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": item }))
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let response = check_status(SERVICE, response).await?;

        let data: NutrientsResponse = response.json().await.map_err(|e| ServiceError::Malformed {
            service: SERVICE,
            detail: format!("failed to parse nutrients for '{}': {}", item, e),
        })?;

        data.foods
            .into_iter()
            .next()
            .map(NutritionRecord::from)
            .ok_or_else(|| ServiceError::Malformed {
                service: SERVICE,
                detail: format!("no food matched '{}'", item),
            })
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
