use colored::Colorize;

use crate::food::types::{default_cuisine, Preferences};

pub fn describe(prefs: &Preferences) -> String {
    let restrictions = if prefs.restrictions.is_empty() {
        "none".to_string()
    } else {
        prefs.restrictions.join(", ")
    };
    format!("restrictions: {} | cuisine: {}", restrictions, prefs.cuisine)
}

pub fn handle_command(command: &str, args: &str, prefs: &mut Preferences) -> Result<String, String> {
    match command {
        "restrict" => {
            if args.is_empty() {
                return Err("Usage: restrict <tag>".to_string());
            }
            let tag = args.to_lowercase();
            if prefs.restrictions.iter().any(|r| r.eq_ignore_ascii_case(&tag)) {
                return Ok(format!("{} is already set", tag.yellow()));
            }
            prefs.restrictions.push(tag.clone());
            Ok(format!("🚫 Added restriction {}", tag.green()))
        }
        "unrestrict" => {
            let before = prefs.restrictions.len();
            prefs.restrictions.retain(|r| !r.eq_ignore_ascii_case(args));
            if prefs.restrictions.len() == before {
                Err(format!("{} is not a current restriction", args))
            } else {
                Ok(format!("✅ Removed restriction {}", args.to_lowercase().red()))
            }
        }
        "cuisine" => {
            prefs.cuisine = if args.is_empty() || args.eq_ignore_ascii_case("any") {
                default_cuisine()
            } else {
                args.to_string()
            };
            Ok(format!("🌍 Cuisine set to {}", prefs.cuisine.cyan()))
        }
        "prefs" => Ok(format!("🥗 {}", describe(prefs))),
        _ => Err(format!("Unknown preference command '{}'", command)),
    }
}
