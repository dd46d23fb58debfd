pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod food;
pub mod providers;
pub mod scanner;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use config::AppConfig;
pub use error::{RecipeError, ServiceError};
pub use food::{extract, IngredientSet, Preferences, RecipeOrchestrator};
