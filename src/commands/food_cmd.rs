use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

use crate::food::extractor::normalize_line;
use crate::food::types::{IngredientSet, NutritionRecord, Preferences, RecipeResult};
use crate::food::RecipeOrchestrator;

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub async fn nutrition(args: &str, orchestrator: &RecipeOrchestrator) -> Result<String, String> {
    let item = normalize_line(args).ok_or("Please specify a food item to analyze.")?;

    let pb = spinner(format!("Looking up {}...", item));
    let result = orchestrator.lookup(&item).await;
    pb.finish_and_clear();

    let record = result.map_err(|e| format!("❌ {}", e))?;
    Ok(format_nutrition(&record))
}

pub async fn generate(
    orchestrator: &RecipeOrchestrator,
    ingredients: &IngredientSet,
    preferences: &Preferences,
) -> Result<String, String> {
    if ingredients.is_empty() {
        return Err("Please add at least one ingredient".to_string());
    }

    let pb = spinner(format!("Cooking up a recipe from {} ingredient(s)...", ingredients.len()));
    let result = orchestrator.generate(ingredients, preferences).await;
    pb.finish_and_clear();

    let result = result.map_err(|e| format!("❌ {}", e))?;
    Ok(format_recipe(&result))
}

fn format_nutrition(record: &NutritionRecord) -> String {
    format!(
        "🔍 {}: {} kcal | protein {}g | carbs {}g | fat {}g",
        record.name.bright_yellow(),
        amount(record.calories),
        amount(record.protein),
        amount(record.carbs),
        amount(record.fat)
    )
}

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn format_recipe(result: &RecipeResult) -> String {
    let recipe = &result.recipe.recipe;
    let mut out = String::new();

    let _ = writeln!(out, "\n👨‍🍳 {}", recipe.name.bold().bright_green());

    let _ = writeln!(out, "\n{}", "Ingredients:".bold());
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  • {}", ingredient);
    }

    let _ = writeln!(out, "\n{}", "Instructions:".bold());
    for (i, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    let estimate = &recipe.nutrition_estimate;
    let _ = writeln!(
        out,
        "\n📊 Estimated per serving: {} kcal | protein {} | carbs {} | fat {}",
        estimate.calories.cyan(),
        estimate.protein.cyan(),
        estimate.carbs.cyan(),
        estimate.fat.cyan()
    );

    if !result.ingredients.nutrition.is_empty() {
        let _ = writeln!(out, "\n{}", "Your ingredients:".bold());
        for record in &result.ingredients.nutrition {
            let _ = writeln!(out, "  {}", format_nutrition(record));
        }
    }

    out
}
