pub mod nutrition;
pub mod recipe;

pub use nutrition::lookup_all;
pub use recipe::{build_recipe_prompt, parse_recipe_response, strip_code_fences, SYSTEM_PROMPT};
