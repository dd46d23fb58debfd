use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;

/// Ordered, de-duplicated collection of ingredient names.
///
/// Two names are the same ingredient when they match ignoring case and a
/// trailing plural ("Tomatoes" and "tomato"). The first spelling seen is kept
/// for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSet {
    items: Vec<String>,
    keys: HashSet<String>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` unless an equivalent entry exists. Blank names are ignored.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if self.keys.insert(dedup_key(name)) {
            self.items.push(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let key = dedup_key(name.trim());
        if !self.keys.remove(&key) {
            return false;
        }
        self.items.retain(|item| dedup_key(item) != key);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&dedup_key(name.trim()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.keys.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IngredientSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl Serialize for IngredientSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IngredientSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

/// Lowercases and folds simple English plurals. A trailing `ie` reads as
/// `y`, so `cookie` and `cookies` share a key.
pub fn dedup_key(name: &str) -> String {
    let singular = singularize(name.to_lowercase());
    match singular.strip_suffix("ie") {
        Some(stem) if !stem.is_empty() => format!("{}y", stem),
        _ => singular,
    }
}

fn singularize(lower: String) -> String {
    if lower.len() > 4 && lower.ends_with("ies") {
        return format!("{}y", &lower[..lower.len() - 3]);
    }
    for suffix in ["oes", "ches", "shes", "sses", "xes", "zes"] {
        if lower.len() > suffix.len() + 1 && lower.ends_with(suffix) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return lower[..lower.len() - 1].to_string();
    }
    lower
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default = "default_cuisine")]
    pub cuisine: String,
}

pub fn default_cuisine() -> String {
    "any".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            restrictions: Vec::new(),
            cuisine: default_cuisine(),
        }
    }
}

impl Preferences {
    /// Trims tags, drops blanks and repeats, and maps an empty cuisine to "any".
    pub fn normalized(self) -> Self {
        let mut seen = HashSet::new();
        let restrictions = self
            .restrictions
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty() && seen.insert(r.to_lowercase()))
            .collect();

        let cuisine = self.cuisine.trim();
        let cuisine = if cuisine.is_empty() {
            default_cuisine()
        } else {
            cuisine.to_string()
        };

        Self {
            restrictions,
            cuisine,
        }
    }

    pub fn has_cuisine(&self) -> bool {
        !self.cuisine.eq_ignore_ascii_case("any")
    }
}

/// Per-item nutrients. A value the nutrition service did not report stays
/// `None` and serialises as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    #[serde(deserialize_with = "display_string")]
    pub calories: String,
    #[serde(deserialize_with = "display_string")]
    pub protein: String,
    #[serde(deserialize_with = "display_string")]
    pub carbs: String,
    #[serde(deserialize_with = "display_string")]
    pub fat: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition_estimate: NutritionEstimate,
}

/// Models are loose about emitting `"350"` versus `350`; both become display text.
fn display_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct RecipeRequest {
    pub items: IngredientSet,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvidedIngredients {
    pub provided: Vec<String>,
    pub nutrition: Vec<NutritionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeResult {
    pub ingredients: ProvidedIngredients,
    pub recipe: AppliedRecipe,
}
