//! Typed user selections: category scope, search query, favorites and theme.
//!
//! These are plain values. `SelectionStore` owns the live instances and
//! persists them; the filter only reads them.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Persisted/wire value meaning "no category scoping".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategorySelection {
    #[default]
    All,
    Category(String),
}

impl CategorySelection {
    pub fn as_str(&self) -> &str {
        match self {
            CategorySelection::All => ALL_CATEGORIES,
            CategorySelection::Category(id) => id.as_str(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategorySelection::All)
    }

    /// True when `category_id` falls inside this scope.
    pub fn includes(&self, category_id: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Category(id) => id == category_id,
        }
    }
}

impl From<&str> for CategorySelection {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategorySelection::All
        } else {
            CategorySelection::Category(value.to_string())
        }
    }
}

impl From<String> for CategorySelection {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            CategorySelection::All
        } else {
            CategorySelection::Category(value)
        }
    }
}

impl From<CategorySelection> for String {
    fn from(value: CategorySelection) -> Self {
        match value {
            CategorySelection::All => ALL_CATEGORIES.to_string(),
            CategorySelection::Category(id) => id,
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current category, free-text query and favorites-only flag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub category: CategorySelection,
    pub query: String,
    pub favorites_only: bool,
}

/// Outcome of `FavoriteSet::toggle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Item ids the user has marked. Serialized as a JSON array of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<String>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) -> Toggle {
        if self.0.remove(id) {
            Toggle::Removed
        } else {
            self.0.insert(id.to_string());
            Toggle::Added
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Ids that `is_known` rejects. Stale ids stay in the set; they just
    /// never match an item.
    pub fn stale_ids<'a>(&'a self, is_known: impl Fn(&str) -> bool) -> Vec<&'a str> {
        self.iter().filter(|id| !is_known(id)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => bail!("Unknown theme: {other}"),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_selection_parses_all_and_ids() {
        assert_eq!(CategorySelection::from("all"), CategorySelection::All);
        assert_eq!(
            CategorySelection::from("dev"),
            CategorySelection::Category("dev".to_string())
        );
        assert_eq!(CategorySelection::from("dev").as_str(), "dev");
        assert!(CategorySelection::All.includes("anything"));
        assert!(!CategorySelection::from("dev").includes("design"));
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut favorites: FavoriteSet = ["gh"].into_iter().collect();
        let before = favorites.clone();

        assert_eq!(favorites.toggle("fig"), Toggle::Added);
        assert!(favorites.contains("fig"));
        assert_eq!(favorites.toggle("fig"), Toggle::Removed);
        assert_eq!(favorites, before);

        assert_eq!(favorites.toggle("gh"), Toggle::Removed);
        assert_eq!(favorites.toggle("gh"), Toggle::Added);
        assert_eq!(favorites, before);
    }

    #[test]
    fn favorites_serialize_as_json_array() {
        let favorites: FavoriteSet = ["b", "a"].into_iter().collect();
        assert_eq!(serde_json::to_string(&favorites).unwrap(), r#"["a","b"]"#);
        let parsed: FavoriteSet = serde_json::from_str(r#"["x"]"#).unwrap();
        assert!(parsed.contains("x"));
    }

    #[test]
    fn stale_ids_are_reported_not_removed() {
        let favorites: FavoriteSet = ["gh", "gone"].into_iter().collect();
        assert_eq!(favorites.stale_ids(|id| id == "gh"), vec!["gone"]);
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn theme_strings_and_toggle() {
        assert_eq!(Theme::try_from("dark").unwrap(), Theme::Dark);
        assert!(Theme::try_from("sepia").is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }
}
