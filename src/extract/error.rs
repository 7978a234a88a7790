use thiserror::Error;

use crate::ai::GenerationError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("failed to fetch website {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("could not find the ingredients container")]
    MissingIngredients,

    #[error("could not get any measured ingredients")]
    NoMeasuredIngredients,

    #[error("could not extract instructions")]
    NoInstructions,

    #[error("could not find a recipe name")]
    MissingTitle,

    #[error("no schema.org Recipe found")]
    NoRecipe,
}

/// Failure reported by a generic scraper delegate.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Everything the synchronous add-recipe path can fail with.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to scrape {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("failed to scrape {url}: {source}")]
    Extract { url: String, source: ExtractError },

    #[error("failed to scrape {url}: {source}")]
    Scrape { url: String, source: ScrapeError },

    #[error("recipe generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("failed to generate recipe")]
    NotGenerated,

    #[error("store error: {0:#}")]
    Store(anyhow::Error),
}
