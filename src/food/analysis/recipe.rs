use crate::error::RecipeError;
use crate::food::types::{Preferences, Recipe};

pub const SYSTEM_PROMPT: &str = "You are a helpful cooking assistant that generates recipes based on available ingredients and dietary preferences.";

/// Builds the user message for the generation call. The restriction and
/// cuisine sentences only appear when they say something.
pub fn build_recipe_prompt<S: AsRef<str>>(ingredients: &[S], preferences: &Preferences) -> String {
    let ingredients: Vec<&str> = ingredients.iter().map(|i| i.as_ref()).collect();

    let mut prompt = format!(
        "Generate a recipe using some or all of these ingredients: {}.\n",
        ingredients.join(", ")
    );

    if !preferences.restrictions.is_empty() {
        prompt.push_str(&format!("Must be {}.\n", preferences.restrictions.join(" and ")));
    }
    if preferences.has_cuisine() {
        prompt.push_str(&format!("Prefer {} cuisine.\n", preferences.cuisine));
    }

    prompt.push_str(
        r#"Format the response as JSON with the following structure:
{
  "name": "Recipe Name",
  "ingredients": ["ingredient 1", "ingredient 2"],
  "instructions": ["step 1", "step 2"],
  "nutritionEstimate": {
    "calories": "approximate calories",
    "protein": "grams",
    "carbs": "grams",
    "fat": "grams"
  }
}"#,
    );

    prompt
}

/// Removes a markdown code fence (```` ``` ```` or ```` ```json ````) wrapped
/// around a payload. Text without a fence comes back trimmed.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`, `JSON`, ...) on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_recipe_response(content: &str) -> Result<Recipe, RecipeError> {
    let payload = strip_code_fences(content);
    serde_json::from_str(payload).map_err(|e| {
        log::error!("Error parsing recipe response: {}", e);
        RecipeError::Parse(e.to_string())
    })
}
