use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    #[serde(default)]
    pub checked: bool,
}

impl ShoppingListItem {
    pub fn unchecked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: String,
    pub items: Vec<ShoppingListItem>,
}

#[derive(Debug, FromRow)]
pub struct ShoppingListRow {
    pub id: Uuid,
    pub name: String,
    pub items: Json<Vec<ShoppingListItem>>,
}

impl From<ShoppingListRow> for ShoppingList {
    fn from(row: ShoppingListRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            items: row.items.0,
        }
    }
}
