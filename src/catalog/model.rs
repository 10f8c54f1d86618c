use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::CATALOG_SCHEMA_VERSION;

const DEFAULT_CATEGORY_ICON: &str = "fa-solid fa-tag";
const DEFAULT_ITEM_ICON: &str = "fa-solid fa-link";

/// Ordered list of categories. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.items.is_empty())
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.items.iter().any(|it| it.id == id))
    }

    /// Parse either the bare array form or the versioned object form.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => {
                let categories: Vec<Category> =
                    serde_json::from_value(value).context("parsing catalog categories")?;
                Ok(Self { categories })
            }
            Value::Object(ref map) => {
                let version = map
                    .get("schema_version")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if version != CATALOG_SCHEMA_VERSION {
                    bail!(
                        "unsupported catalog schema_version '{}', expected {}",
                        version,
                        CATALOG_SCHEMA_VERSION
                    );
                }
                let categories = map
                    .get("categories")
                    .cloned()
                    .unwrap_or(Value::Array(Vec::new()));
                let categories: Vec<Category> =
                    serde_json::from_value(categories).context("parsing catalog categories")?;
                Ok(Self { categories })
            }
            _ => bail!("Unsupported catalog JSON; expected array or object"),
        }
    }
}

impl Category {
    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_CATEGORY_ICON)
    }
}

impl Item {
    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ITEM_ICON)
    }
}

/// Read a catalog file without schema or uniqueness checks.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Catalog::from_value(value).with_context(|| format!("decoding catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_bare_array_and_versioned_object() {
        let categories = json!([
            {"id": "dev", "name": "Dev Tools", "items": [
                {"id": "gh", "title": "GitHub", "desc": "Code hosting", "url": "https://github.com"}
            ]}
        ]);
        let bare = Catalog::from_value(categories.clone()).expect("bare array");
        let wrapped = Catalog::from_value(json!({
            "schema_version": "nav_catalog_v1",
            "categories": categories,
        }))
        .expect("versioned object");
        assert_eq!(bare, wrapped);
        assert_eq!(bare.item_count(), 1);
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let err = Catalog::from_value(json!({"schema_version": "nav_catalog_v0", "categories": []}))
            .unwrap_err();
        assert!(err.to_string().contains("nav_catalog_v0"));
    }

    #[test]
    fn missing_icons_fall_back_to_defaults() {
        let catalog = Catalog::from_value(json!([
            {"id": "dev", "name": "Dev", "items": [{"id": "a", "title": "A", "url": "u"}]}
        ]))
        .unwrap();
        let category = &catalog.categories[0];
        assert_eq!(category.icon(), "fa-solid fa-tag");
        assert_eq!(category.items[0].icon(), "fa-solid fa-link");
        assert_eq!(category.items[0].desc, "");
    }
}
