use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::ai::refine::ExtractRecipeDetailsTask;
use crate::ai::synthesize::GenerateRecipeTask;
use crate::ai::{create_model, GenerativeModel};
use crate::config::AppConfig;
use crate::extract::fetch::{HttpFetcher, PageFetcher};
use crate::extract::generic::{GenericAdapter, RecipeScraper, SchemaOrgScraper};
use crate::extract::wprm::WprmExtractor;
use crate::extract::Dispatcher;
use crate::notion::client::{NotionClient, PageSync};
use crate::notion::repo::{NotionPageRepo, PgNotionPageRepo};
use crate::recipes::repo::{PgRecipeRepo, RecipeRepo};
use crate::refinement::{spawn_workers, RefinementJob, RefinementQueue, Refiner};
use crate::shopping_lists::repo::{PgShoppingListRepo, ShoppingListRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub recipes: Arc<dyn RecipeRepo>,
    pub shopping_lists: Arc<dyn ShoppingListRepo>,
    pub notion_pages: Arc<dyn NotionPageRepo>,
    pub page_sync: Option<Arc<dyn PageSync>>,
    pub dispatcher: Arc<Dispatcher>,
    pub refinements: RefinementQueue,
}

/// External seams the state is assembled from.
pub struct Collaborators {
    pub recipes: Arc<dyn RecipeRepo>,
    pub shopping_lists: Arc<dyn ShoppingListRepo>,
    pub notion_pages: Arc<dyn NotionPageRepo>,
    pub page_sync: Option<Arc<dyn PageSync>>,
    pub model: Arc<dyn GenerativeModel>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub scraper: Arc<dyn RecipeScraper>,
}

impl AppState {
    /// Builds Postgres-backed state and starts the refinement workers.
    pub fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let model = create_model(&config.ai).context("configure generative model")?;
        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpFetcher::new().context("build page fetcher")?);
        let page_sync = config
            .notion
            .as_ref()
            .map(|n| Arc::new(NotionClient::new(n)) as Arc<dyn PageSync>);
        if page_sync.is_none() {
            tracing::info!("NOTION_TOKEN or NOTION_PARENT_PAGE_ID missing; page sync disabled");
        }

        let parts = Collaborators {
            recipes: Arc::new(PgRecipeRepo::new(db.clone())),
            shopping_lists: Arc::new(PgShoppingListRepo::new(db.clone())),
            notion_pages: Arc::new(PgNotionPageRepo::new(db)),
            page_sync,
            model,
            scraper: Arc::new(SchemaOrgScraper::new(fetcher.clone())),
            fetcher,
        };

        let workers = config.refinement.workers;
        let (state, refiner, rx) = Self::from_parts(Arc::new(config), parts);
        spawn_workers(Arc::new(refiner), rx, workers);
        tracing::info!(workers, "refinement workers started");
        Ok(state)
    }

    /// Wires the pipeline without starting workers; the caller owns the job receiver.
    pub fn from_parts(
        config: Arc<AppConfig>,
        parts: Collaborators,
    ) -> (Self, Refiner, mpsc::Receiver<RefinementJob>) {
        let dispatcher = Dispatcher::new(
            WprmExtractor::new(parts.fetcher, config.structured_sites.clone()),
            GenericAdapter::new(parts.scraper),
            GenerateRecipeTask::new(parts.model.clone()),
        );
        let refiner = Refiner::new(
            ExtractRecipeDetailsTask::new(parts.model),
            parts.recipes.clone(),
        );
        let (refinements, rx) = RefinementQueue::new(config.refinement.queue_capacity);

        let state = Self {
            config,
            recipes: parts.recipes,
            shopping_lists: parts.shopping_lists,
            notion_pages: parts.notion_pages,
            page_sync: parts.page_sync,
            dispatcher: Arc::new(dispatcher),
            refinements,
        };
        (state, refiner, rx)
    }
}
