use anyhow::Context;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ShoppingList, ShoppingListItem, ShoppingListRow};

#[async_trait]
pub trait ShoppingListRepo: Send + Sync {
    async fn create(&self, name: &str, items: &[ShoppingListItem]) -> anyhow::Result<Uuid>;
    async fn find_all(&self) -> anyhow::Result<Vec<ShoppingList>>;
    /// Replaces the whole item sequence. Returns false when no list has this id.
    async fn update_items(&self, id: Uuid, items: &[ShoppingListItem]) -> anyhow::Result<bool>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgShoppingListRepo {
    db: PgPool,
}

impl PgShoppingListRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShoppingListRepo for PgShoppingListRepo {
    async fn create(&self, name: &str, items: &[ShoppingListItem]) -> anyhow::Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO shopping_lists (name, items)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(Json(items))
        .fetch_one(&self.db)
        .await
        .context("insert shopping list")?;
        Ok(id)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<ShoppingList>> {
        let rows = sqlx::query_as::<_, ShoppingListRow>(
            r#"
            SELECT id, name, items
              FROM shopping_lists
             ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list shopping lists")?;
        Ok(rows.into_iter().map(ShoppingList::from).collect())
    }

    async fn update_items(&self, id: Uuid, items: &[ShoppingListItem]) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE shopping_lists SET items = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(items))
            .execute(&self.db)
            .await
            .context("update shopping list items")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM shopping_lists WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete shopping list")?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryShoppingListRepo;

#[cfg(test)]
mod memory {
    use std::sync::RwLock;

    use super::*;

    #[derive(Default)]
    pub struct MemoryShoppingListRepo {
        rows: RwLock<Vec<ShoppingList>>,
    }

    #[async_trait]
    impl ShoppingListRepo for MemoryShoppingListRepo {
        async fn create(&self, name: &str, items: &[ShoppingListItem]) -> anyhow::Result<Uuid> {
            let id = Uuid::new_v4();
            self.rows.write().unwrap().push(ShoppingList {
                id,
                name: name.to_string(),
                items: items.to_vec(),
            });
            Ok(id)
        }

        async fn find_all(&self) -> anyhow::Result<Vec<ShoppingList>> {
            Ok(self.rows.read().unwrap().clone())
        }

        async fn update_items(
            &self,
            id: Uuid,
            items: &[ShoppingListItem],
        ) -> anyhow::Result<bool> {
            let mut rows = self.rows.write().unwrap();
            match rows.iter_mut().find(|l| l.id == id) {
                Some(list) => {
                    list.items = items.to_vec();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
            self.rows.write().unwrap().retain(|l| l.id != id);
            Ok(())
        }
    }
}
