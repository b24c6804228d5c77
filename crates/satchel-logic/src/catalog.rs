//! Item definitions loaded from JSON.
//!
//! This is where malformed shapes are caught. Everything past
//! [`ItemCatalog::instantiate`] can assume a well-formed [`Shape`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{Item, ItemCategory, ItemId};
use crate::shape::{Shape, ShapeError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not parse item catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item key {0:?} defined more than once")]
    DuplicateKey(String),
    #[error("no item definition for key {0:?}")]
    UnknownKey(String),
    #[error("item {key:?} has a malformed shape: {source}")]
    BadShape {
        key: String,
        #[source]
        source: ShapeError,
    },
}

/// One entry of the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub key: String,
    pub name: String,
    pub category: ItemCategory,
    pub shape: Vec<Vec<u8>>,
    /// Loot drops start hidden unless marked otherwise.
    #[serde(default)]
    pub revealed: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<ItemDef>,
}

/// Validated item definitions, in file order.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    defs: Vec<(ItemDef, Shape)>,
}

impl ItemCatalog {
    /// Parse `{"items": [...]}` and validate every shape and key.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_defs(file.items)
    }

    pub fn from_defs(defs: Vec<ItemDef>) -> Result<Self, CatalogError> {
        let mut keys = HashSet::new();
        let mut validated = Vec::with_capacity(defs.len());
        for def in defs {
            if !keys.insert(def.key.clone()) {
                return Err(CatalogError::DuplicateKey(def.key));
            }
            let shape = Shape::from_rows(def.shape.clone()).map_err(|source| {
                CatalogError::BadShape {
                    key: def.key.clone(),
                    source,
                }
            })?;
            validated.push((def, shape));
        }
        Ok(Self { defs: validated })
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ItemDef> {
        self.defs.iter().map(|(def, _)| def).find(|def| def.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.defs.iter().map(|(def, _)| def.key.as_str())
    }

    /// Create a fresh item from definition `key`, at the origin and unrotated.
    pub fn instantiate(&self, key: &str, id: ItemId) -> Result<Item, CatalogError> {
        let (def, shape) = self
            .defs
            .iter()
            .find(|(def, _)| def.key == key)
            .ok_or_else(|| CatalogError::UnknownKey(key.to_string()))?;
        let mut item = Item::new(id, def.name.clone(), def.category, shape.clone());
        item.revealed = def.revealed;
        Ok(item)
    }
}
