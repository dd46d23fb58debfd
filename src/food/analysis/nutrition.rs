use futures::future::try_join_all;

use crate::error::ServiceError;
use crate::food::api::NutritionProvider;
use crate::food::types::NutritionRecord;

/// Looks up every item concurrently, one call per item. Results keep the order
/// of `items`; the first failure fails the whole batch and drops the rest.
pub async fn lookup_all<S: AsRef<str>>(
    provider: &dyn NutritionProvider,
    items: &[S],
) -> Result<Vec<NutritionRecord>, ServiceError> {
    let lookups = items.iter().map(|item| async move {
        let item = item.as_ref();
        provider.lookup(item).await.map_err(|e| {
            log::warn!("Nutrition lookup for '{}' failed: {}", item, e);
            e
        })
    });

    try_join_all(lookups).await
}
