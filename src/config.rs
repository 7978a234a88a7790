use anyhow::Context;
use serde::Deserialize;

use crate::extract::wprm::DEFAULT_ORIGINS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gemini,
    Fake,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotionConfig {
    pub token: String,
    pub parent_page_id: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefinementConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub ai: AiConfig,
    pub structured_sites: Vec<String>,
    pub refinement: RefinementConfig,
    pub notion: Option<NotionConfig>,
    pub static_dir: String,
    pub index_html: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let provider = match std::env::var("AI_PROVIDER")
            .unwrap_or_else(|_| "gemini".into())
            .as_str()
        {
            "gemini" => AiProvider::Gemini,
            "fake" => AiProvider::Fake,
            other => anyhow::bail!("unknown AI_PROVIDER: {other}"),
        };
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        if provider == AiProvider::Gemini && api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY is not set");
        }
        let ai = AiConfig {
            provider,
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-lite".into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
        };

        let structured_sites = std::env::var("STRUCTURED_SITES")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect());

        let refinement = RefinementConfig {
            workers: env_parse("REFINEMENT_WORKERS").unwrap_or(2).max(1),
            queue_capacity: env_parse("REFINEMENT_QUEUE_CAPACITY").unwrap_or(64).max(1),
        };

        let notion = match (
            std::env::var("NOTION_TOKEN"),
            std::env::var("NOTION_PARENT_PAGE_ID"),
        ) {
            (Ok(token), Ok(parent_page_id)) if !token.is_empty() && !parent_page_id.is_empty() => {
                Some(NotionConfig {
                    token,
                    parent_page_id,
                    base_url: std::env::var("NOTION_BASE_URL")
                        .unwrap_or_else(|_| "https://api.notion.com/v1".into()),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS").unwrap_or(10),
            ai,
            structured_sites,
            refinement,
            notion,
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
            index_html: std::env::var("INDEX_HTML")
                .unwrap_or_else(|_| "templates/index.html".into()),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" https://a.example/ ,, https://b.example");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn parse_origins_empty_input() {
        assert!(parse_origins("").is_empty());
    }
}
