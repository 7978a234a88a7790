use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Instructions are stored as one string; steps are separated by this delimiter.
pub const INSTRUCTION_DELIMITER: &str = "\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    #[serde(default, alias = "_id")]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "img_url")]
    pub image_url: Option<String>,
    /// Canonical, unit-free names. May lag behind until refinement runs.
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(alias = "measuredIngredients")]
    pub measured_ingredients: Vec<String>,
    #[serde(default)]
    pub cuisine: String,
    pub instructions: String,
}

impl Recipe {
    /// A recipe is only persisted once it has a title and at least one measured ingredient.
    pub fn is_persistable(&self) -> bool {
        !self.title.trim().is_empty() && !self.measured_ingredients.is_empty()
    }

    pub fn instruction_steps(&self) -> impl Iterator<Item = &str> {
        self.instructions
            .split(INSTRUCTION_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Derived fields produced by the refinement model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetails {
    #[serde(default)]
    pub cuisine: String,
    #[serde(alias = "ingredients_list")]
    pub ingredients: Vec<String>,
}

/// Intermediate result of a markup parse, before it becomes a `Recipe`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingredients {
    pub ingredients: Option<Vec<String>>,
    pub measured_ingredients: Option<Vec<String>>,
}
