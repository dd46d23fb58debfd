pub mod nutritionix;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::food::types::NutritionRecord;

// Re-export common types
pub use nutritionix::NutritionixClient;

/// Looks up macro-nutrients for a single ingredient name.
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    async fn lookup(&self, item: &str) -> Result<NutritionRecord, ServiceError>;

    fn name(&self) -> &'static str;
}
