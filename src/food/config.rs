use crate::config::{required, url_value, ConfigError};

pub const DEFAULT_NUTRITIONIX_URL: &str = "https://trackapi.nutritionix.com/v2";

#[derive(Debug, Clone)]
pub struct FoodConfig {
    pub nutritionix_app_id: String,
    pub nutritionix_app_key: String,
    pub api_url: String,
}

impl FoodConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("NUTRITIONIX_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NUTRITIONIX_URL.to_string());

        Ok(Self {
            nutritionix_app_id: required(lookup, "NUTRITIONIX_APP_ID")?,
            nutritionix_app_key: required(lookup, "NUTRITIONIX_APP_KEY")?,
            api_url: url_value("NUTRITIONIX_API_URL", api_url)?,
        })
    }
}
