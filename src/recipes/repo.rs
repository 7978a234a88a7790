use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Recipe;

/// Document store for recipes. The store assigns ids on insert.
#[async_trait]
pub trait RecipeRepo: Send + Sync {
    async fn insert(&self, recipe: &Recipe) -> anyhow::Result<Uuid>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Recipe>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>>;
    /// Patches only `ingredients` and `cuisine`. Returns false when no recipe has this id.
    async fn update_details(
        &self,
        id: Uuid,
        ingredients: &[String],
        cuisine: &str,
    ) -> anyhow::Result<bool>;
    /// Overwrites title, ingredients, measured ingredients and instructions.
    async fn update(&self, id: Uuid, recipe: &Recipe) -> anyhow::Result<bool>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgRecipeRepo {
    db: PgPool,
}

impl PgRecipeRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepo for PgRecipeRepo {
    async fn insert(&self, recipe: &Recipe) -> anyhow::Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO recipes (title, url, image_url, ingredients, measured_ingredients, cuisine, instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&recipe.title)
        .bind(&recipe.url)
        .bind(&recipe.image_url)
        .bind(&recipe.ingredients)
        .bind(&recipe.measured_ingredients)
        .bind(&recipe.cuisine)
        .bind(&recipe.instructions)
        .fetch_one(&self.db)
        .await
        .context("insert recipe")?;
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, url, image_url, ingredients, measured_ingredients, cuisine, instructions
              FROM recipes
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find recipe by id")?;
        Ok(recipe)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, url, image_url, ingredients, measured_ingredients, cuisine, instructions
              FROM recipes
             ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list recipes")?;
        Ok(rows)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, url, image_url, ingredients, measured_ingredients, cuisine, instructions
              FROM recipes
             WHERE id = ANY($1)
             ORDER BY created_at ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await
        .context("find recipes by ids")?;
        Ok(rows)
    }

    async fn update_details(
        &self,
        id: Uuid,
        ingredients: &[String],
        cuisine: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
               SET ingredients = $2, cuisine = $3
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ingredients)
        .bind(cuisine)
        .execute(&self.db)
        .await
        .context("update recipe details")?;
        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: Uuid, recipe: &Recipe) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
               SET title = $2, ingredients = $3, measured_ingredients = $4, instructions = $5
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&recipe.title)
        .bind(&recipe.ingredients)
        .bind(&recipe.measured_ingredients)
        .bind(&recipe.instructions)
        .execute(&self.db)
        .await
        .context("update recipe")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recipe")?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryRecipeRepo;

#[cfg(test)]
mod memory {
    use std::sync::RwLock;

    use super::*;

    /// Insertion-ordered in-memory store.
    #[derive(Default)]
    pub struct MemoryRecipeRepo {
        rows: RwLock<Vec<Recipe>>,
    }

    #[async_trait]
    impl RecipeRepo for MemoryRecipeRepo {
        async fn insert(&self, recipe: &Recipe) -> anyhow::Result<Uuid> {
            let id = Uuid::new_v4();
            let mut stored = recipe.clone();
            stored.id = Some(id);
            self.rows.write().unwrap().push(stored);
            Ok(id)
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
            let rows = self.rows.read().unwrap();
            Ok(rows.iter().find(|r| r.id == Some(id)).cloned())
        }

        async fn find_all(&self) -> anyhow::Result<Vec<Recipe>> {
            Ok(self.rows.read().unwrap().clone())
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Recipe>> {
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .filter(|r| r.id.map(|id| ids.contains(&id)).unwrap_or(false))
                .cloned()
                .collect())
        }

        async fn update_details(
            &self,
            id: Uuid,
            ingredients: &[String],
            cuisine: &str,
        ) -> anyhow::Result<bool> {
            let mut rows = self.rows.write().unwrap();
            match rows.iter_mut().find(|r| r.id == Some(id)) {
                Some(r) => {
                    r.ingredients = ingredients.to_vec();
                    r.cuisine = cuisine.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn update(&self, id: Uuid, recipe: &Recipe) -> anyhow::Result<bool> {
            let mut rows = self.rows.write().unwrap();
            match rows.iter_mut().find(|r| r.id == Some(id)) {
                Some(r) => {
                    r.title = recipe.title.clone();
                    r.ingredients = recipe.ingredients.clone();
                    r.measured_ingredients = recipe.measured_ingredients.clone();
                    r.instructions = recipe.instructions.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
            self.rows.write().unwrap().retain(|r| r.id != Some(id));
            Ok(())
        }
    }
}
