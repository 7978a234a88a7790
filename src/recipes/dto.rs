use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Recipe;

#[derive(Debug, Deserialize)]
pub struct AddAutoRequest {
    /// A recipe URL or a free-text dish description.
    pub request: String,
}

#[derive(Debug, Deserialize)]
pub struct AddManualRequest {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub id: Uuid,
    pub recipe: Recipe,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
}
