use std::sync::Arc;

use scraper::{ElementRef, Html};
use tracing::debug;

use super::error::{DispatchError, ExtractError};
use super::fetch::PageFetcher;
use super::selector;
use crate::recipes::repo_types::{Ingredients, Recipe, INSTRUCTION_DELIMITER};
use crate::text::{capitalize, normalize_whitespace};

/// Sites known to publish WP Recipe Maker markup.
pub const DEFAULT_ORIGINS: &[&str] = &[
    "https://hebbarskitchen.com",
    "https://www.vegrecipesofindia.com",
];

pub struct WprmExtractor {
    fetcher: Arc<dyn PageFetcher>,
    origins: Vec<String>,
}

impl WprmExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, origins: Vec<String>) -> Self {
        Self { fetcher, origins }
    }

    /// Whether `origin` (`scheme://host[:port]`) is registered for this extractor.
    pub fn handles(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    pub async fn extract(&self, url: &str) -> Result<Recipe, DispatchError> {
        let html = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| DispatchError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let recipe = parse_recipe(&html, url).map_err(|source| DispatchError::Extract {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, title = %recipe.title, "structured markup parsed");
        Ok(recipe)
    }
}

pub fn parse_recipe(html: &str, url: &str) -> Result<Recipe, ExtractError> {
    let document = Html::parse_document(html);

    let ingredients = extract_ingredients(&document).ok_or(ExtractError::MissingIngredients)?;
    let measured_ingredients = ingredients
        .measured_ingredients
        .filter(|m| !m.is_empty())
        .ok_or(ExtractError::NoMeasuredIngredients)?;

    let instructions = extract_instructions(&document);
    if instructions.is_empty() {
        return Err(ExtractError::NoInstructions);
    }

    let title = extract_title(&document).ok_or(ExtractError::MissingTitle)?;

    Ok(Recipe {
        id: None,
        title,
        url: url.to_string(),
        image_url: extract_image(&document),
        ingredients: ingredients.ingredients.unwrap_or_default(),
        measured_ingredients,
        cuisine: extract_cuisine(&document).unwrap_or_default(),
        instructions: instructions.join(INSTRUCTION_DELIMITER),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    scope
        .select(&selector(css))
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty())
}

fn extract_title(document: &Html) -> Option<String> {
    let root = document.root_element();
    first_text(root, ".wprm-recipe-name").or_else(|| first_text(root, "title"))
}

fn extract_ingredients(document: &Html) -> Option<Ingredients> {
    let container = document
        .select(&selector(".wprm-recipe-ingredients-container"))
        .next()?;

    let mut ingredients = Vec::new();
    let mut measured_ingredients = Vec::new();

    let item = selector("li");
    for group in container.select(&selector(".wprm-recipe-ingredient-group")) {
        for li in group.select(&item) {
            let amount = first_text(li, ".wprm-recipe-ingredient-amount");
            let unit = first_text(li, ".wprm-recipe-ingredient-unit");
            let name = first_text(li, ".wprm-recipe-ingredient-name");

            let measured = [amount.as_deref(), unit.as_deref(), name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            if !measured.is_empty() {
                measured_ingredients.push(measured);
            }
            if let Some(name) = name {
                ingredients.push(name);
            }
        }
    }

    Some(Ingredients {
        ingredients: Some(ingredients),
        measured_ingredients: Some(measured_ingredients),
    })
}

fn extract_instructions(document: &Html) -> Vec<String> {
    let Some(container) = document
        .select(&selector(".wprm-recipe-instructions-container"))
        .next()
    else {
        return Vec::new();
    };

    let step_text = selector(".wprm-recipe-instruction-text");
    let step_list = selector(".wprm-recipe-instructions");

    let mut lines = Vec::new();
    for group in container.select(&selector(".wprm-recipe-instruction-group")) {
        if let Some(name) = first_text(group, ".wprm-recipe-group-name") {
            lines.push(capitalize(&name));
        }

        let mut steps: Vec<String> = group.select(&step_text).map(text_of).collect();
        if steps.is_empty() {
            steps = group.select(&step_list).map(text_of).collect();
        }
        lines.extend(
            steps
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| capitalize(s)),
        );
    }
    lines
}

fn extract_cuisine(document: &Html) -> Option<String> {
    first_text(document.root_element(), ".wprm-recipe-cuisine").map(|c| capitalize(&c))
}

fn extract_image(document: &Html) -> Option<String> {
    let root = document.root_element();
    root.select(&selector(".wprm-recipe-image img"))
        .next()
        .and_then(|img| {
            let attrs = img.value();
            attrs
                .attr("data-lazy-src")
                .or_else(|| attrs.attr("src"))
                .map(str::to_string)
        })
        .or_else(|| {
            root.select(&selector(r#"meta[property="og:image"]"#))
                .next()
                .and_then(|m| m.value().attr("content"))
                .map(str::to_string)
        })
        .filter(|s| !s.trim().is_empty())
}
