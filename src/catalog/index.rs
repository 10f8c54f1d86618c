//! Indexed view of a link catalog.
//!
//! The index validates the catalog file against the bundled JSON Schema and
//! then enforces the invariants the schema cannot express: item ids unique
//! across the whole catalog, unique category ids, and no category claiming
//! the reserved `all` id. It is strict so the filter never has to guess
//! which category an item belongs to.

use crate::catalog::{CATALOG_SCHEMA_VERSION, Catalog, Category, Item};
use crate::schema_loader::CompiledSchema;
use crate::selection::ALL_CATEGORIES;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Debug)]
/// Catalog plus a derived lookup keyed by item id.
pub struct CatalogIndex {
    catalog: Catalog,
    // item id -> (category position, item position)
    by_item: BTreeMap<String, (usize, usize)>,
}

impl CatalogIndex {
    /// Load, schema-validate, and index the catalog at `path`.
    pub fn load(path: &Path, schema_path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let value: Value = serde_json::from_str(&data)
            .with_context(|| format!("parsing catalog {}", path.display()))?;

        let schema = CompiledSchema::load(schema_path, Some(CATALOG_SCHEMA_VERSION))?;
        schema
            .validate(&value)
            .with_context(|| format!("validating catalog {}", path.display()))?;

        let catalog =
            Catalog::from_value(value).with_context(|| format!("loading {}", path.display()))?;
        Self::from_catalog(catalog)
    }

    /// Index an in-memory catalog, applying the same id checks as `load`.
    pub fn from_catalog(catalog: Catalog) -> Result<Self> {
        let by_item = build_index(&catalog)?;
        Ok(Self { catalog, by_item })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve an item id to its owning category and the item itself.
    ///
    /// Returns `None` for ids the catalog does not know; callers decide
    /// whether that matters (stale favorites are tolerated).
    pub fn item(&self, id: &str) -> Option<(&Category, &Item)> {
        let (cat_pos, item_pos) = *self.by_item.get(id)?;
        let category = &self.catalog.categories[cat_pos];
        Some((category, &category.items[item_pos]))
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.by_item.contains_key(id)
    }

    pub fn contains_category(&self, id: &str) -> bool {
        self.catalog.category(id).is_some()
    }

    /// Iterates item ids in stable (sorted) order.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.by_item.keys().map(String::as_str)
    }
}

fn build_index(catalog: &Catalog) -> Result<BTreeMap<String, (usize, usize)>> {
    let mut category_ids: BTreeSet<&str> = BTreeSet::new();
    let mut map = BTreeMap::new();

    for (cat_pos, category) in catalog.categories.iter().enumerate() {
        if category.id.trim().is_empty() {
            bail!("encountered category with no id");
        }
        if category.id == ALL_CATEGORIES {
            bail!("category id '{}' is reserved", ALL_CATEGORIES);
        }
        if !category_ids.insert(category.id.as_str()) {
            bail!("duplicate category id {}", category.id);
        }

        for (item_pos, item) in category.items.iter().enumerate() {
            if item.id.trim().is_empty() {
                bail!("category {} contains an item with no id", category.id);
            }
            if let Some((prev_cat, _)) = map.get(&item.id) {
                let prev: &Category = &catalog.categories[*prev_cat];
                bail!(
                    "duplicate item id {} (in categories {} and {})",
                    item.id,
                    prev.id,
                    category.id
                );
            }
            map.insert(item.id.clone(), (cat_pos, item_pos));
        }
    }

    Ok(map)
}
