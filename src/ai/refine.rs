use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::schema::{self, parse_response, ResponseSchema};
use super::{GenerationError, GenerationRequest, GenerativeModel};
use crate::recipes::repo_types::RecipeDetails;

impl ResponseSchema for RecipeDetails {
    fn schema() -> Value {
        schema::object(&[
            ("cuisine", schema::string()),
            ("ingredients", schema::string_array()),
        ])
    }

    fn is_complete(&self) -> bool {
        !self.ingredients.is_empty()
    }
}

fn prompt(dish_name: &str, measured_ingredients: &[String]) -> String {
    let ingredients_json =
        serde_json::to_string(measured_ingredients).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"You are an ingredient extraction expert and culinary analyst. Process the following dish name and JSON list of recipe ingredients.

Dish name: {dish_name}

Input JSON:
{ingredients_json}

Part 1: cuisine detection
Use the dish name and the ingredients to determine the most likely cuisine (e.g. Italian, Mexican, Indian, Thai, French).

Part 2: ingredient extraction
For each string in the list, return only the base ingredient name in singular form. Strip all measurements, quantities, units, preparation instructions and parenthetical notes. Keep the cut of meat, including ground meat (e.g. "ground beef", "chicken breast").

Return only a single JSON object that conforms to the provided schema, with no introductory text, markdown formatting or explanations.

Example:
{{"cuisine": "indian", "ingredients": ["chicken breast", "tomato sauce", "ginger", "turmeric", "heavy cream", "salt", "pepper"]}}"#
    )
}

/// Derives canonical ingredients and cuisine from a dish name and its measured ingredients.
pub struct ExtractRecipeDetailsTask {
    model: Arc<dyn GenerativeModel>,
}

impl ExtractRecipeDetailsTask {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn refine(
        &self,
        dish_name: &str,
        measured_ingredients: &[String],
    ) -> Result<Option<RecipeDetails>, GenerationError> {
        let prompt = prompt(dish_name, measured_ingredients);
        let request = GenerationRequest {
            system_instruction: None,
            prompt: &prompt,
            response_schema: RecipeDetails::schema(),
        };

        let Some(text) = self.model.generate(&request).await? else {
            warn!(model = %self.model.model_name(), %dish_name, "model returned no recipe details");
            return Ok(None);
        };
        Ok(parse_response::<RecipeDetails>(&text))
    }
}

#[cfg(test)]
mod refine_tests {
    use super::*;
    use crate::ai::FakeModel;

    #[test]
    fn prompt_embeds_dish_and_ingredients_as_json() {
        let p = prompt("Aloo Gobi", &["2 potatoes".into(), "1 \"small\" cauliflower".into()]);
        assert!(p.contains("Dish name: Aloo Gobi"));
        assert!(p.contains(r#"["2 potatoes","1 \"small\" cauliflower"]"#));
        assert!(p.contains("ground beef"));
    }

    #[tokio::test]
    async fn returns_details_from_model() {
        let model = Arc::new(FakeModel::new());
        model.add_response(
            "Aloo Gobi",
            r#"{"cuisine":"indian","ingredients":["potato","cauliflower"]}"#,
        );
        let task = ExtractRecipeDetailsTask::new(model);
        let details = task
            .refine("Aloo Gobi", &["2 potatoes".into(), "1 cauliflower".into()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(details.cuisine, "indian");
        assert_eq!(details.ingredients, vec!["potato", "cauliflower"]);
    }

    #[tokio::test]
    async fn accepts_legacy_list_key() {
        let model = Arc::new(FakeModel::new());
        model.add_response("Dal", r#"{"cuisine":"indian","ingredients_list":["lentil"]}"#);
        let task = ExtractRecipeDetailsTask::new(model);
        let details = task.refine("Dal", &["1 cup lentils".into()]).await.unwrap().unwrap();
        assert_eq!(details.ingredients, vec!["lentil"]);
    }

    #[tokio::test]
    async fn non_conforming_output_is_absent() {
        let model = Arc::new(FakeModel::new().with_default_response("{\"cuisine\": 5}"));
        let task = ExtractRecipeDetailsTask::new(model);
        assert!(task.refine("Soup", &["1 l stock".into()]).await.unwrap().is_none());
    }
}
