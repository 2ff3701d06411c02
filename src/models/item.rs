//! Financeable goods

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub in_stock: bool,
}

impl Record for Item {
    const TABLE: &'static str = "items";
    const ENTITY: &'static str = "Item";
}

fn default_in_stock() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

impl NewItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            in_stock: true,
        }
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl ItemChanges {
    pub fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(in_stock) = self.in_stock {
            item.in_stock = in_stock;
        }
    }
}
