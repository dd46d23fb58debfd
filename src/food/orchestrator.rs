//! Fans a recipe request out to the nutrition service and the recipe
//! generator and merges the answers.
//!
//! Every request makes exactly one nutrition call per ingredient and one
//! generation call, all in flight at once. Any single failure fails the whole
//! request, and nothing is retried. The whole fan-out runs under one deadline;
//! when it passes, the pending calls are dropped.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::error::RecipeError;
use crate::food::analysis::{build_recipe_prompt, lookup_all, parse_recipe_response, SYSTEM_PROMPT};
use crate::food::api::NutritionProvider;
use crate::food::types::{
    AppliedRecipe, IngredientSet, NutritionRecord, Preferences, ProvidedIngredients, Recipe,
    RecipeRequest, RecipeResult,
};
use crate::providers::traits::CompletionProvider;

#[derive(Clone)]
pub struct RecipeOrchestrator {
    nutrition: Arc<dyn NutritionProvider>,
    generator: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl RecipeOrchestrator {
    pub fn new(nutrition: Arc<dyn NutritionProvider>, generator: Arc<dyn CompletionProvider>) -> Self {
        Self {
            nutrition,
            generator,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn generate(
        &self,
        items: &IngredientSet,
        preferences: &Preferences,
    ) -> Result<RecipeResult, RecipeError> {
        let request = RecipeRequest {
            items: items.clone(),
            preferences: preferences.clone(),
        };
        self.run(request).await
    }

    async fn run(&self, request: RecipeRequest) -> Result<RecipeResult, RecipeError> {
        if request.items.is_empty() {
            return Err(RecipeError::Validation(
                "Please add at least one ingredient".to_string(),
            ));
        }

        let request_id = Uuid::new_v4();
        let items = request.items.as_slice();
        log::info!(
            "[{}] Generating recipe for {} ingredient(s): {}",
            request_id,
            items.len(),
            items.join(", ")
        );

        let prompt = build_recipe_prompt(items, &request.preferences);

        let fan_out = async {
            tokio::try_join!(
                async { lookup_all(self.nutrition.as_ref(), items).await.map_err(RecipeError::from) },
                self.generate_recipe(&prompt),
            )
        };

        let (nutrition, recipe) = tokio::time::timeout(self.timeout, fan_out)
            .await
            .map_err(|_| {
                log::error!("[{}] Gave up after {:?}", request_id, self.timeout);
                RecipeError::Timeout(self.timeout)
            })??;

        log::info!("[{}] Generated '{}'", request_id, recipe.name);

        Ok(RecipeResult {
            ingredients: ProvidedIngredients {
                provided: request.items.to_vec(),
                nutrition,
            },
            recipe: AppliedRecipe {
                recipe,
                preferences: request.preferences,
            },
        })
    }

    async fn generate_recipe(&self, prompt: &str) -> Result<Recipe, RecipeError> {
        let content = self.generator.complete(SYSTEM_PROMPT, prompt).await.map_err(|e| {
            log::error!("Error generating recipe: {}", e);
            RecipeError::from(e)
        })?;
        parse_recipe_response(&content)
    }

    /// Nutrition facts for `items`, in the same order, under the same deadline.
    pub async fn nutrition(&self, items: &[String]) -> Result<Vec<NutritionRecord>, RecipeError> {
        tokio::time::timeout(self.timeout, lookup_all(self.nutrition.as_ref(), items))
            .await
            .map_err(|_| RecipeError::Timeout(self.timeout))?
            .map_err(RecipeError::from)
    }

    pub async fn lookup(&self, item: &str) -> Result<NutritionRecord, RecipeError> {
        self.nutrition(&[item.to_string()])
            .await?
            .pop()
            .ok_or_else(|| RecipeError::Validation("no ingredient given".to_string()))
    }
}
