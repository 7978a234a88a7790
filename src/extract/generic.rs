use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use serde_json::Value;
use tracing::debug;

use super::error::{DispatchError, ExtractError, ScrapeError};
use super::fetch::PageFetcher;
use super::selector;
use crate::recipes::repo_types::{Recipe, INSTRUCTION_DELIMITER};
use crate::text::normalize_whitespace;

/// What a generic scraper hands back, verbatim from the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedRecipe {
    pub title: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[async_trait]
pub trait RecipeScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError>;
}

pub struct GenericAdapter {
    scraper: Arc<dyn RecipeScraper>,
}

impl GenericAdapter {
    pub fn new(scraper: Arc<dyn RecipeScraper>) -> Self {
        Self { scraper }
    }

    /// Canonical ingredients are left empty; background refinement fills them in.
    pub async fn extract(&self, url: &str) -> Result<Recipe, DispatchError> {
        let scrape_error = |source: ScrapeError| DispatchError::Scrape {
            url: url.to_string(),
            source,
        };

        let scraped = self.scraper.scrape(url).await.map_err(scrape_error)?;
        if scraped.ingredients.is_empty() {
            return Err(scrape_error(ExtractError::NoMeasuredIngredients.into()));
        }
        if scraped.title.trim().is_empty() {
            return Err(scrape_error(ExtractError::MissingTitle.into()));
        }

        Ok(Recipe {
            id: None,
            title: scraped.title,
            url: url.to_string(),
            image_url: scraped.image,
            ingredients: Vec::new(),
            measured_ingredients: scraped.ingredients,
            cuisine: String::new(),
            instructions: scraped.instructions,
        })
    }
}

pub struct SchemaOrgScraper {
    fetcher: Arc<dyn PageFetcher>,
}

impl SchemaOrgScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl RecipeScraper for SchemaOrgScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError> {
        let html = self.fetcher.fetch(url).await?;
        let scraped = parse_schema_org(&html)?;
        debug!(%url, title = %scraped.title, "schema.org recipe parsed");
        Ok(scraped)
    }
}

pub fn parse_schema_org(html: &str) -> Result<ScrapedRecipe, ExtractError> {
    let document = Html::parse_document(html);
    from_json_ld(&document).or_else(|_| from_microdata(&document))
}

fn from_json_ld(document: &Html) -> Result<ScrapedRecipe, ExtractError> {
    for script in document.select(&selector(r#"script[type="application/ld+json"]"#)) {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(&sanitize_json(&raw)) else {
            continue;
        };
        if let Some(recipe) = find_recipe(&json) {
            return recipe_from_json(recipe);
        }
    }
    Err(ExtractError::NoRecipe)
}

/// Escapes raw control characters some sites leave inside JSON strings.
fn sanitize_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in json.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    out.push(c);
                }
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {}
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

fn is_recipe_type(value: &Value) -> bool {
    match value {
        Value::String(s) => s == "Recipe",
        Value::Array(types) => types.iter().any(|t| t == "Recipe"),
        _ => false,
    }
}

fn find_recipe(json: &Value) -> Option<&Value> {
    match json {
        Value::Object(obj) => {
            if obj.get("@type").map(is_recipe_type).unwrap_or(false) {
                return Some(json);
            }
            obj.values().find_map(find_recipe)
        }
        Value::Array(items) => items.iter().find_map(find_recipe),
        _ => None,
    }
}

fn recipe_from_json(recipe: &Value) -> Result<ScrapedRecipe, ExtractError> {
    let title = recipe
        .get("name")
        .and_then(Value::as_str)
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::MissingTitle)?;

    let ingredients: Vec<String> = recipe
        .get("recipeIngredient")
        .or_else(|| recipe.get("ingredients"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_whitespace)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if ingredients.is_empty() {
        return Err(ExtractError::NoMeasuredIngredients);
    }

    let mut steps = Vec::new();
    if let Some(instructions) = recipe.get("recipeInstructions") {
        collect_steps(instructions, &mut steps);
    }
    if steps.is_empty() {
        return Err(ExtractError::NoInstructions);
    }

    Ok(ScrapedRecipe {
        title,
        image: recipe.get("image").and_then(image_url),
        ingredients,
        instructions: steps.join(INSTRUCTION_DELIMITER),
    })
}

/// Flattens plain strings, `HowToStep` objects and `HowToSection` groups.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(s) => steps.extend(
            s.lines()
                .map(normalize_whitespace)
                .filter(|line| !line.is_empty()),
        ),
        Value::Array(items) => items.iter().for_each(|item| collect_steps(item, steps)),
        Value::Object(obj) => {
            if let Some(section) = obj.get("itemListElement") {
                if let Some(name) = obj.get("name").and_then(Value::as_str) {
                    let name = normalize_whitespace(name);
                    if !name.is_empty() {
                        steps.push(name);
                    }
                }
                collect_steps(section, steps);
            } else if let Some(text) = obj.get("text") {
                collect_steps(text, steps);
            }
        }
        _ => {}
    }
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(image_url),
        Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn from_microdata(document: &Html) -> Result<ScrapedRecipe, ExtractError> {
    let recipe = document
        .select(&selector(
            r#"[itemtype="http://schema.org/Recipe"], [itemtype="https://schema.org/Recipe"]"#,
        ))
        .next()
        .ok_or(ExtractError::NoRecipe)?;

    let title = itemprop_text(recipe, "name").ok_or(ExtractError::MissingTitle)?;

    let ingredients: Vec<String> = recipe
        .select(&selector(r#"[itemprop="recipeIngredient"], [itemprop="ingredients"]"#))
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(ExtractError::NoMeasuredIngredients);
    }

    let steps: Vec<String> = recipe
        .select(&selector(r#"[itemprop="recipeInstructions"]"#))
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .collect();
    if steps.is_empty() {
        return Err(ExtractError::NoInstructions);
    }

    let image = recipe
        .select(&selector(r#"[itemprop="image"]"#))
        .next()
        .and_then(|el| {
            let attrs = el.value();
            attrs
                .attr("src")
                .or_else(|| attrs.attr("content"))
                .or_else(|| attrs.attr("href"))
                .map(str::to_string)
        });

    Ok(ScrapedRecipe {
        title,
        image,
        ingredients,
        instructions: steps.join(INSTRUCTION_DELIMITER),
    })
}

fn itemprop_text(scope: ElementRef<'_>, prop: &str) -> Option<String> {
    let el = scope
        .select(&selector(&format!(r#"[itemprop="{prop}"]"#)))
        .next()?;
    let text = match el.value().attr("content") {
        Some(content) => normalize_whitespace(content),
        None => normalize_whitespace(&el.text().collect::<String>()),
    };
    Some(text).filter(|s| !s.is_empty())
}
