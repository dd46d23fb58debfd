use colored::Colorize;

use crate::food::extractor::normalize_line;
use crate::food::types::IngredientSet;

pub fn describe(set: &IngredientSet) -> String {
    if set.is_empty() {
        "(none)".to_string()
    } else {
        set.to_vec().join(", ")
    }
}

/// Typed items go through the same cleanup as scanned lines, so "2 Tomatoes"
/// and "tomato" end up as one entry.
pub fn handle_command(command: &str, args: &str, set: &mut IngredientSet) -> Result<String, String> {
    match command {
        "add" => {
            let name = normalize_line(args).ok_or("Usage: add <item>")?;
            if set.insert(name.clone()) {
                Ok(format!("➕ Added {}", name.green()))
            } else {
                Ok(format!("{} is already on the list", name.yellow()))
            }
        }
        "remove" => {
            let name = normalize_line(args).ok_or("Usage: remove <item>")?;
            if set.remove(&name) {
                Ok(format!("➖ Removed {}", name.red()))
            } else {
                Err(format!("{} is not on the list", name))
            }
        }
        "list" => Ok(format!("🧺 Ingredients ({}): {}", set.len(), describe(set))),
        "clear" => {
            set.clear();
            Ok("🧹 Cleared all ingredients".to_string())
        }
        _ => Err(format!("Unknown ingredient command '{}'", command)),
    }
}
