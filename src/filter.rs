//! Visible-item computation.
//!
//! `compute_visible` is a pure, linear scan over the catalog: category
//! scoping, then a case-insensitive substring match over title, description
//! and category name, then the favorites-only gate. No step reorders, so the
//! output is always a subsequence of the catalog in catalog order. Every
//! selection change recomputes from scratch; catalogs are tens to low
//! hundreds of items, so there is no index or cache here.

use crate::catalog::{Catalog, Item};
use crate::selection::{FavoriteSet, SelectionState};
use serde::Serialize;

/// One visible card: the item plus the category it was listed under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisibleEntry<'a> {
    #[serde(rename = "category")]
    pub category_id: &'a str,
    #[serde(rename = "categoryName")]
    pub category_name: &'a str,
    pub item: &'a Item,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VisibleItems<'a> {
    pub entries: Vec<VisibleEntry<'a>>,
    pub count: usize,
}

impl<'a> VisibleItems<'a> {
    fn from_entries(entries: Vec<VisibleEntry<'a>>) -> Self {
        let count = entries.len();
        Self { entries, count }
    }

    /// Zero results, whatever the cause; the caller shows its empty state.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn result_count_label(&self) -> String {
        match self.count {
            1 => "1 result".to_string(),
            n => format!("{n} results"),
        }
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|entry| entry.item.id.as_str())
    }
}

/// Case-fold and trim for matching. A leading or trailing byte-order mark
/// counts as whitespace.
pub fn normalize(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
}

pub fn compute_visible<'a>(
    catalog: &'a Catalog,
    selection: &SelectionState,
    favorites: &FavoriteSet,
) -> VisibleItems<'a> {
    let query = normalize(&selection.query);

    let entries = catalog
        .categories
        .iter()
        .filter(|category| selection.category.includes(&category.id))
        .flat_map(|category| {
            category.items.iter().map(move |item| VisibleEntry {
                category_id: category.id.as_str(),
                category_name: category.name.as_str(),
                item,
            })
        })
        .filter(|entry| query.is_empty() || matches_query(entry, &query))
        .filter(|entry| !selection.favorites_only || favorites.contains(&entry.item.id))
        .collect();

    VisibleItems::from_entries(entries)
}

fn matches_query(entry: &VisibleEntry<'_>, query: &str) -> bool {
    [entry.item.title.as_str(), entry.item.desc.as_str(), entry.category_name]
        .iter()
        .any(|field| normalize(field).contains(query))
}
