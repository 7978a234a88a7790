use tracing::{info, instrument};
use uuid::Uuid;

use super::client::PageSync;
use super::repo::NotionPageRepo;
use crate::shopping_lists::repo_types::ShoppingListItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created(String),
    Updated(String),
}

/// Mirrors a shopping list to its page, creating the page and mapping on first sync.
#[instrument(skip(pages, page_sync, items))]
pub async fn sync(
    pages: &dyn NotionPageRepo,
    page_sync: &dyn PageSync,
    id: Uuid,
    name: &str,
    items: &[ShoppingListItem],
) -> anyhow::Result<SyncOutcome> {
    let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();

    match pages.find(id).await? {
        Some(page_id) => {
            info!(%id, %page_id, "updating notion page");
            page_sync.update_page(&page_id, name, &names).await?;
            Ok(SyncOutcome::Updated(page_id))
        }
        None => {
            let page_id = page_sync.create_page(name, &names).await?;
            pages.insert(id, &page_id).await?;
            info!(%id, %page_id, "notion page created");
            Ok(SyncOutcome::Created(page_id))
        }
    }
}
