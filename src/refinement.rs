use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::ai::refine::ExtractRecipeDetailsTask;
use crate::recipes::repo::RecipeRepo;
use crate::text::capitalize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinementJob {
    pub recipe_id: Uuid,
    pub dish_name: String,
    pub measured_ingredients: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementOutcome {
    Applied,
    /// Nothing to refine; the model is not called.
    Skipped,
    NoDetails,
    Failed,
    RecipeMissing,
}

#[derive(Clone)]
pub struct RefinementQueue {
    tx: mpsc::Sender<RefinementJob>,
}

impl RefinementQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<RefinementJob>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Never waits. Returns false when the job was dropped.
    pub fn enqueue(&self, job: RefinementJob) -> bool {
        let recipe_id = job.recipe_id;
        match self.tx.try_send(job) {
            Ok(()) => {
                debug!(%recipe_id, "refinement scheduled");
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%recipe_id, "refinement queue full; job dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%recipe_id, "refinement queue closed; job dropped");
                false
            }
        }
    }
}

pub struct Refiner {
    task: ExtractRecipeDetailsTask,
    recipes: Arc<dyn RecipeRepo>,
}

impl Refiner {
    pub fn new(task: ExtractRecipeDetailsTask, recipes: Arc<dyn RecipeRepo>) -> Self {
        Self { task, recipes }
    }

    pub async fn run(&self, job: &RefinementJob) -> RefinementOutcome {
        let recipe_id = job.recipe_id;
        let dish_name = job.dish_name.as_str();

        if job.measured_ingredients.is_empty() {
            debug!(%recipe_id, %dish_name, "no measured ingredients; refinement skipped");
            return RefinementOutcome::Skipped;
        }

        let details = match self.task.refine(dish_name, &job.measured_ingredients).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                warn!(%recipe_id, %dish_name, "no recipe details extracted");
                return RefinementOutcome::NoDetails;
            }
            Err(e) => {
                error!(error = %e, %recipe_id, %dish_name, "recipe details extraction failed");
                return RefinementOutcome::Failed;
            }
        };

        let cuisine = capitalize(details.cuisine.trim());
        match self
            .recipes
            .update_details(recipe_id, &details.ingredients, &cuisine)
            .await
        {
            Ok(true) => {
                info!(%recipe_id, %dish_name, %cuisine, count = details.ingredients.len(), "recipe refined");
                RefinementOutcome::Applied
            }
            Ok(false) => {
                warn!(%recipe_id, %dish_name, "recipe gone before refinement finished");
                RefinementOutcome::RecipeMissing
            }
            Err(e) => {
                error!(error = %e, %recipe_id, %dish_name, "failed to store recipe details");
                RefinementOutcome::Failed
            }
        }
    }
}

/// Starts `workers` tasks that share one receiver and run jobs until the queue closes.
pub fn spawn_workers(
    refiner: Arc<Refiner>,
    rx: mpsc::Receiver<RefinementJob>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    let rx = Arc::new(Mutex::new(rx));
    (0..workers.max(1))
        .map(|worker| {
            let refiner = refiner.clone();
            let rx = rx.clone();
            tokio::spawn(async move {
                loop {
                    // Lock is released before the job runs.
                    let job = rx.lock().await.recv().await;
                    let Some(job) = job else { break };
                    let outcome = refiner.run(&job).await;
                    debug!(worker, recipe_id = %job.recipe_id, ?outcome, "refinement job done");
                }
                debug!(worker, "refinement worker stopped");
            })
        })
        .collect()
}
