use std::collections::HashSet;

use tracing::{info, instrument};
use uuid::Uuid;

use super::repo_types::ShoppingListItem;
use crate::recipes::repo_types::Recipe;
use crate::state::AppState;

/// Canonical ingredients across `recipes`, first occurrence wins, compared case-insensitively.
pub fn unique_ingredients(recipes: &[Recipe]) -> Vec<String> {
    let mut seen = HashSet::new();
    recipes
        .iter()
        .flat_map(|r| r.ingredients.iter())
        .map(|i| i.trim())
        .filter(|i| !i.is_empty() && seen.insert(i.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Unknown recipe ids are ignored.
#[instrument(skip(state, recipe_ids), fields(requested = recipe_ids.len()))]
pub async fn create_from_recipes(
    state: &AppState,
    name: &str,
    recipe_ids: &[Uuid],
) -> anyhow::Result<Uuid> {
    let recipes = state.recipes.find_by_ids(recipe_ids).await?;
    let items: Vec<ShoppingListItem> = unique_ingredients(&recipes)
        .into_iter()
        .map(ShoppingListItem::unchecked)
        .collect();

    let id = state.shopping_lists.create(name, &items).await?;
    info!(%id, recipes = recipes.len(), items = items.len(), "shopping list built from recipes");
    Ok(id)
}

#[cfg(test)]
mod shopping_list_service_tests {
    use super::*;
    use crate::recipes::repo::RecipeRepo;
    use crate::testing::TestHarness;

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            title: title.into(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            measured_ingredients: vec!["1 thing".into()],
            instructions: "Cook".into(),
            ..Recipe::default()
        }
    }

    #[test]
    fn unique_ingredients_keeps_first_seen_order() {
        let recipes = vec![
            recipe("A", &["Onion", "garlic", " "]),
            recipe("B", &["onion", "tomato", "Garlic"]),
        ];
        assert_eq!(unique_ingredients(&recipes), vec!["Onion", "garlic", "tomato"]);
    }

    #[tokio::test]
    async fn builds_list_from_stored_recipes() {
        let harness = TestHarness::new();
        let a = harness.recipes.insert(&recipe("A", &["rice", "dal"])).await.unwrap();
        let b = harness.recipes.insert(&recipe("B", &["dal", "ghee"])).await.unwrap();

        let id = create_from_recipes(&harness.state, "Week", &[a, b, Uuid::new_v4()])
            .await
            .unwrap();

        let lists = harness.state.shopping_lists.find_all().await.unwrap();
        let list = lists.iter().find(|l| l.id == id).unwrap();
        assert_eq!(list.name, "Week");
        let names: Vec<_> = list.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["rice", "dal", "ghee"]);
        assert!(list.items.iter().all(|i| !i.checked));
    }

    #[tokio::test]
    async fn unknown_recipes_give_empty_list() {
        let harness = TestHarness::new();
        let id = create_from_recipes(&harness.state, "Empty", &[Uuid::new_v4()])
            .await
            .unwrap();
        let lists = harness.state.shopping_lists.find_all().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, id);
        assert!(lists[0].items.is_empty());
    }
}
