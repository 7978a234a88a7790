pub mod fake;
pub mod gemini;
pub mod refine;
pub mod schema;
pub mod synthesize;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::{AiConfig, AiProvider};
pub use fake::FakeModel;
pub use gemini::GeminiModel;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// One structured-output request.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub system_instruction: Option<&'a str>,
    pub prompt: &'a str,
    pub response_schema: Value,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the model's text, or `None` when it answered without any.
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<String>, GenerationError>;

    fn model_name(&self) -> &str;
}

pub fn create_model(config: &AiConfig) -> Result<Arc<dyn GenerativeModel>, GenerationError> {
    match config.provider {
        AiProvider::Fake => Ok(Arc::new(FakeModel::with_demo_responses())),
        AiProvider::Gemini => {
            if config.api_key.is_empty() {
                return Err(GenerationError::NotConfigured(
                    "GEMINI_API_KEY is not set".into(),
                ));
            }
            Ok(Arc::new(GeminiModel::new(
                config.api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
            )))
        }
    }
}
