use colored::Colorize;

use super::CommandOutcome;

pub fn handle_command(command: &str) -> Result<CommandOutcome, String> {
    match command {
        "help" => {
            println!("\n{}", "🥕 Ingredient Commands:".bold());
            println!("  add <item>       - Add an ingredient (quantities are ignored)");
            println!("  remove <item>    - Remove an ingredient");
            println!("  list             - Show current ingredients");
            println!("  clear            - Remove all ingredients");
            println!();

            println!("{}", "🥗 Preference Commands:".bold());
            println!("  restrict <tag>   - Add a dietary restriction (e.g. vegetarian)");
            println!("  unrestrict <tag> - Remove a dietary restriction");
            println!("  cuisine <name>   - Set the cuisine, or 'any'");
            println!("  prefs            - Show current preferences");
            println!();

            println!("{}", "📷 Fridge Scan Commands:".bold());
            println!("  scan                 - Load ingredients from the latest scan");
            println!("  watch start <secs>   - Reload ingredients whenever a new scan appears");
            println!("  watch stop           - Stop watching for scans");
            println!("  check                - Ask the fridge camera to take a new picture");
            println!();

            println!("{}", "👨‍🍳 Recipe Commands:".bold());
            println!("  nutrition <item> - Nutrition facts for one ingredient");
            println!("  generate         - Generate a recipe from current ingredients");
            println!();

            println!("{}", "⚙️ System Commands:".bold());
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            Ok(CommandOutcome::Continue)
        }
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            Ok(CommandOutcome::Exit)
        }
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string()),
    }
}
