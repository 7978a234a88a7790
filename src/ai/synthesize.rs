use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::schema::{self, parse_response, ResponseSchema};
use super::{GenerationError, GenerationRequest, GenerativeModel};
use crate::recipes::repo_types::Recipe;

/// Adult portions every generated recipe is scaled to.
pub const SERVINGS: u32 = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedRecipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(alias = "measuredIngredients")]
    pub measured_ingredients: Vec<String>,
    #[serde(default)]
    pub cuisine: String,
    pub instructions: String,
}

impl ResponseSchema for GeneratedRecipe {
    fn schema() -> Value {
        schema::object(&[
            ("title", schema::string()),
            ("ingredients", schema::string_array()),
            ("measured_ingredients", schema::string_array()),
            ("cuisine", schema::string()),
            ("instructions", schema::string()),
        ])
    }

    fn is_complete(&self) -> bool {
        let recipe = Recipe::from(self.clone());
        recipe.is_persistable() && recipe.instruction_steps().next().is_some()
    }
}

impl From<GeneratedRecipe> for Recipe {
    fn from(g: GeneratedRecipe) -> Self {
        Self {
            id: None,
            title: g.title.trim().to_string(),
            url: String::new(),
            image_url: None,
            ingredients: g.ingredients,
            measured_ingredients: g.measured_ingredients,
            cuisine: g.cuisine.trim().to_string(),
            instructions: g.instructions,
        }
    }
}

fn system_instruction() -> String {
    format!(
        r#"You are a world-class culinary expert and recipe generator. Generate a complete, authentic recipe for the user's request, scaled for {SERVINGS} average adult servings. Scale every quantity to {SERVINGS} servings.

Return the whole recipe as a single JSON object that strictly conforms to the provided schema. Do not add any introductory text, markdown formatting or explanations outside of the JSON object.

Fields:
* title (string): the proper name of the dish.
* ingredients (list of strings): every base ingredient in singular form with all quantities and measurements removed, e.g. ["chicken breast", "onion", "carrot"].
* measured_ingredients (list of strings): every ingredient with precise quantity and unit, e.g. ["300 g boneless chicken breast", "1 large onion, chopped", "2 medium carrots"].
* cuisine (string): the traditional cuisine of the dish, e.g. "Italian" or "Mexican".
* instructions (string): clear, numbered, step-by-step instructions in one string, with a newline between steps.

Example:
{{"title": "Chicken Tikka Masala", "ingredients": ["chicken breast", "tomato sauce", "ginger"], "measured_ingredients": ["300 g chicken breast", "200 ml tomato sauce", "1 tbsp grated ginger"], "cuisine": "Indian", "instructions": "1. Cut the chicken\n2. Marinate the chicken\n3. Cook the chicken in the sauce"}}"#
    )
}

/// Invents a full recipe from a free-text dish request.
pub struct GenerateRecipeTask {
    model: Arc<dyn GenerativeModel>,
    system_instruction: String,
}

impl GenerateRecipeTask {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            system_instruction: system_instruction(),
        }
    }

    /// `Ok(None)` means the model answered but produced no usable recipe.
    pub async fn synthesize(&self, prompt: &str) -> Result<Option<Recipe>, GenerationError> {
        let request = GenerationRequest {
            system_instruction: Some(&self.system_instruction),
            prompt,
            response_schema: GeneratedRecipe::schema(),
        };

        let Some(text) = self.model.generate(&request).await? else {
            warn!(model = %self.model.model_name(), "no recipe generated");
            return Ok(None);
        };

        let recipe = parse_response::<GeneratedRecipe>(&text).map(Recipe::from);
        debug!(generated = recipe.is_some(), "recipe synthesis finished");
        Ok(recipe)
    }
}
