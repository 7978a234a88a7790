use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{ShoppingList, ShoppingListItem};

#[derive(Debug, Deserialize)]
pub struct CreateShoppingListRequest {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ShoppingListItem>,
}

/// Body of both list update and page sync. Update ignores `name`.
#[derive(Debug, Deserialize)]
pub struct UpdateShoppingListRequest {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub items: Vec<ShoppingListItem>,
}

#[derive(Debug, Deserialize)]
pub struct FromRecipesRequest {
    pub name: String,
    pub recipe_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShoppingListsResponse {
    pub lists: Vec<ShoppingList>,
}
