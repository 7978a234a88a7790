pub mod error;
pub mod fetch;
pub mod generic;
pub mod wprm;

use scraper::Selector;
use tracing::{debug, info};
use url::Url;

use crate::ai::synthesize::GenerateRecipeTask;
use crate::recipes::repo_types::Recipe;
use error::DispatchError;
use generic::GenericAdapter;
use wprm::WprmExtractor;

pub use error::{ExtractError, FetchError, ScrapeError};

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Parses `input` as a URL when it has both a scheme and a host.
pub fn parse_url(input: &str) -> Option<Url> {
    let input = input.trim();
    let url = Url::parse(input).ok()?;
    // `http:example.com` parses with a host, but carries no network location.
    if !input
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"))
    {
        return None;
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

/// `scheme://host[:port]`, without a trailing slash.
pub fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    StructuredData(String),
    GenericScraper(String),
    Synthesis(String),
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub recipe: Recipe,
    /// Set when canonical ingredients and cuisine still have to be derived.
    pub needs_refinement: bool,
}

pub struct Dispatcher {
    structured: WprmExtractor,
    generic: GenericAdapter,
    synthesis: GenerateRecipeTask,
}

impl Dispatcher {
    pub fn new(
        structured: WprmExtractor,
        generic: GenericAdapter,
        synthesis: GenerateRecipeTask,
    ) -> Self {
        Self {
            structured,
            generic,
            synthesis,
        }
    }

    pub fn classify(&self, input: &str) -> Strategy {
        let input = input.trim();
        match parse_url(input) {
            Some(url) if self.structured.handles(&origin(&url)) => {
                Strategy::StructuredData(input.to_string())
            }
            Some(_) => Strategy::GenericScraper(input.to_string()),
            None => Strategy::Synthesis(input.to_string()),
        }
    }

    pub async fn dispatch(&self, input: &str) -> Result<Extraction, DispatchError> {
        let strategy = self.classify(input);
        debug!(?strategy, "input classified");

        let extraction = match strategy {
            // No fallback to the generic scraper for registered sites.
            Strategy::StructuredData(url) => Extraction {
                recipe: self.structured.extract(&url).await?,
                needs_refinement: false,
            },
            Strategy::GenericScraper(url) => Extraction {
                recipe: self.generic.extract(&url).await?,
                needs_refinement: true,
            },
            Strategy::Synthesis(prompt) => {
                let recipe = self
                    .synthesis
                    .synthesize(&prompt)
                    .await?
                    .ok_or(DispatchError::NotGenerated)?;
                Extraction {
                    recipe,
                    needs_refinement: false,
                }
            }
        };

        info!(title = %extraction.recipe.title, "extracted recipe");
        Ok(extraction)
    }
}

#[cfg(test)]
mod dispatcher_tests {
    use super::*;
    use crate::testing::TestHarness;

    #[test]
    fn parse_url_requires_scheme_and_host() {
        assert!(parse_url("https://example.com/recipe/1").is_some());
        assert!(parse_url("  http://localhost:3000/x ").is_some());
        assert!(parse_url("chicken tikka masala for dinner").is_none());
        assert!(parse_url("example.com/recipe").is_none());
        assert!(parse_url("mailto:chef@example.com").is_none());
        assert!(parse_url("http:example.com").is_none());
        assert!(parse_url("https:/example.com/recipe").is_none());
        assert!(parse_url("").is_none());
    }

    #[test]
    fn origin_drops_path_and_default_port() {
        let url = parse_url("https://www.vegrecipesofindia.com:443/poha/?x=1").unwrap();
        assert_eq!(origin(&url), "https://www.vegrecipesofindia.com");
        let url = parse_url("http://localhost:8080/a").unwrap();
        assert_eq!(origin(&url), "http://localhost:8080");
    }

    #[test]
    fn classify_routes_by_origin() {
        let harness = TestHarness::new();
        let dispatcher = &harness.state.dispatcher;
        assert_eq!(
            dispatcher.classify("https://hebbarskitchen.com/poha-recipe/"),
            Strategy::StructuredData("https://hebbarskitchen.com/poha-recipe/".into())
        );
        assert_eq!(
            dispatcher.classify("https://example.com/recipe/1"),
            Strategy::GenericScraper("https://example.com/recipe/1".into())
        );
        assert_eq!(
            dispatcher.classify("chicken tikka masala for dinner"),
            Strategy::Synthesis("chicken tikka masala for dinner".into())
        );
        assert_eq!(
            dispatcher.classify("http:example.com"),
            Strategy::Synthesis("http:example.com".into())
        );
    }

    #[test]
    fn urls_never_route_to_synthesis() {
        let harness = TestHarness::new();
        for input in [
            "https://example.com",
            "ftp://files.example.com/recipe.txt",
            "http://hebbarskitchen.com/poha",
            "https://www.vegrecipesofindia.com/dal",
        ] {
            assert!(
                !matches!(harness.state.dispatcher.classify(input), Strategy::Synthesis(_)),
                "{input} routed to synthesis"
            );
        }
    }

    #[tokio::test]
    async fn registered_site_failure_does_not_fall_back() {
        let harness = TestHarness::new();
        harness.fetcher.add_page(
            "https://hebbarskitchen.com/broken",
            "<html><body><h1>No recipe card</h1></body></html>",
        );
        harness.scraper.add(
            "https://hebbarskitchen.com/broken",
            generic::ScrapedRecipe {
                title: "Should not be used".into(),
                image: None,
                ingredients: vec!["1 thing".into()],
                instructions: "Nope".into(),
            },
        );

        let err = harness
            .state
            .dispatcher
            .dispatch("https://hebbarskitchen.com/broken")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Extract {
                source: ExtractError::MissingIngredients,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn registered_site_non_200_is_fetch_error() {
        let harness = TestHarness::new();
        harness
            .fetcher
            .add_status("https://hebbarskitchen.com/gone", 404);
        let err = harness
            .state
            .dispatcher
            .dispatch("https://hebbarskitchen.com/gone")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Fetch { .. }));
    }

    #[tokio::test]
    async fn synthesis_without_usable_output_is_not_generated() {
        let harness = TestHarness::new();
        harness.model.add_response("culinary expert", "not json at all");
        let err = harness
            .state
            .dispatcher
            .dispatch("something tasty")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotGenerated));
    }
}
