pub mod analysis;
pub mod api;
pub mod config;
pub mod extractor;
pub mod orchestrator;
pub mod types;

pub use extractor::extract;
pub use orchestrator::RecipeOrchestrator;
pub use types::{IngredientSet, NutritionRecord, Preferences, Recipe, RecipeResult};
