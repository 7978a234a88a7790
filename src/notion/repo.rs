use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Maps a shopping-list id to the external page that mirrors it.
#[async_trait]
pub trait NotionPageRepo: Send + Sync {
    async fn find(&self, internal_id: Uuid) -> anyhow::Result<Option<String>>;
    async fn insert(&self, internal_id: Uuid, notion_page_id: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgNotionPageRepo {
    db: PgPool,
}

impl PgNotionPageRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotionPageRepo for PgNotionPageRepo {
    async fn find(&self, internal_id: Uuid) -> anyhow::Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT notion_page_id FROM notion_pages WHERE internal_id = $1")
                .bind(internal_id)
                .fetch_optional(&self.db)
                .await
                .context("find notion page")?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert(&self, internal_id: Uuid, notion_page_id: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notion_pages (internal_id, notion_page_id)
            VALUES ($1, $2)
            ON CONFLICT (internal_id) DO UPDATE SET notion_page_id = EXCLUDED.notion_page_id
            "#,
        )
        .bind(internal_id)
        .bind(notion_page_id)
        .execute(&self.db)
        .await
        .context("insert notion page")?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryNotionPageRepo;
