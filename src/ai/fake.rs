use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{GenerationError, GenerationRequest, GenerativeModel};

/// Answers with the first registered response whose pattern occurs in the prompt.
#[derive(Debug, Default)]
pub struct FakeModel {
    responses: RwLock<Vec<(String, String)>>,
    default_response: Option<String>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((contains.to_lowercase(), response.to_string()));
    }

    /// Canned synthesis answer so the add-recipe flow runs without a provider.
    /// Refinement gets no answer and is dropped.
    pub fn with_demo_responses() -> Self {
        let model = Self::new();
        model.add_response(
            "culinary expert",
            r#"{
                "title": "Tomato Egg Stir-Fry",
                "ingredients": ["egg", "tomato", "scallion", "salt", "sugar", "vegetable oil"],
                "measured_ingredients": ["4 large eggs", "3 medium tomatoes", "2 scallions", "1/2 tsp salt", "1 tsp sugar", "2 tbsp vegetable oil"],
                "cuisine": "Chinese",
                "instructions": "1. Beat the eggs with a pinch of salt.\n2. Scramble the eggs in hot oil and set aside.\n3. Cook the tomatoes with sugar and salt until saucy.\n4. Return the eggs, toss with scallions and serve."
            }"#,
        );
        model
    }
}

#[cfg(test)]
impl FakeModel {
    /// Every call fails as a provider error with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<String>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(GenerationError::RequestFailed(message.clone()));
        }

        let haystack = format!(
            "{}\n{}",
            request.system_instruction.unwrap_or_default(),
            request.prompt
        )
        .to_lowercase();

        let responses = self
            .responses
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((_, response)) = responses
            .iter()
            .find(|(pattern, _)| haystack.contains(pattern.as_str()))
        {
            return Ok(Some(response.clone()));
        }

        Ok(self.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
