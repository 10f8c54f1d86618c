//! Selection store: the single owner of mutable user selections.
//!
//! `SelectionStore::load` decodes each persisted key into a `Decoded` value,
//! so a missing, unreadable or malformed key is a classified default rather
//! than a swallowed error. Mutators update memory first and then write the
//! affected key through synchronously. The first failed write flips the
//! store into memory-only mode for the rest of the session; nothing here
//! returns an error to the caller.

use crate::catalog::Catalog;
use crate::filter::{VisibleItems, compute_visible};
use crate::selection::{CategorySelection, FavoriteSet, SelectionState, Theme, Toggle};
use crate::storage::{
    CATEGORY_KEY, FAVORITES_KEY, FAVORITES_ONLY_KEY, KeyValueStore, StoreError, THEME_KEY,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Why a key fell back to its default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DefaultReason {
    Absent,
    Unreadable(String),
    Malformed(String),
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::Absent => f.write_str("not set"),
            DefaultReason::Unreadable(detail) => write!(f, "unreadable: {detail}"),
            DefaultReason::Malformed(detail) => write!(f, "malformed: {detail}"),
        }
    }
}

/// Per-key decode outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded<T> {
    Stored(T),
    Defaulted { value: T, reason: DefaultReason },
}

impl<T> Decoded<T> {
    pub fn value(&self) -> &T {
        match self {
            Decoded::Stored(value) | Decoded::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Decoded::Stored(value) | Decoded::Defaulted { value, .. } => value,
        }
    }

    pub fn default_reason(&self) -> Option<&DefaultReason> {
        match self {
            Decoded::Stored(_) => None,
            Decoded::Defaulted { reason, .. } => Some(reason),
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Decoded::Stored(value) => Decoded::Stored(f(value)),
            Decoded::Defaulted { value, reason } => Decoded::Defaulted {
                value: f(value),
                reason,
            },
        }
    }
}

/// How each persisted key was resolved by the last `load`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub theme: Option<DefaultReason>,
    pub favorites: Option<DefaultReason>,
    pub category: Option<DefaultReason>,
    pub favorites_only: Option<DefaultReason>,
}

impl LoadReport {
    /// Keys that fell back for a reason other than simply being unset.
    pub fn failures(&self) -> Vec<(&'static str, &DefaultReason)> {
        [
            (THEME_KEY, &self.theme),
            (FAVORITES_KEY, &self.favorites),
            (CATEGORY_KEY, &self.category),
            (FAVORITES_ONLY_KEY, &self.favorites_only),
        ]
        .into_iter()
        .filter_map(|(key, reason)| match reason {
            Some(DefaultReason::Absent) | None => None,
            Some(reason) => Some((key, reason)),
        })
        .collect()
    }
}

pub struct SelectionStore<S: KeyValueStore> {
    backend: S,
    degraded: bool,
    selection: SelectionState,
    favorites: FavoriteSet,
    theme: Theme,
    report: LoadReport,
}

impl<S: KeyValueStore> SelectionStore<S> {
    /// Read persisted selections from `backend`, defaulting per key.
    ///
    /// `system_theme` stands in for the platform color-scheme preference and
    /// is only consulted when no theme is stored. The resolved theme is
    /// written back immediately.
    pub fn load(backend: S, system_theme: Option<Theme>) -> Self {
        let favorites = decode_favorites(read_key(&backend, FAVORITES_KEY));
        let category = decode_category(read_key(&backend, CATEGORY_KEY));
        let favorites_only = decode_favorites_only(read_key(&backend, FAVORITES_ONLY_KEY));
        let theme = decode_theme(read_key(&backend, THEME_KEY));

        let theme_stored = matches!(theme, Decoded::Stored(_));
        let theme = theme.map(|stored| stored.or(system_theme).unwrap_or_default());

        for (key, reason) in [
            (FAVORITES_KEY, favorites.default_reason()),
            (CATEGORY_KEY, category.default_reason()),
            (FAVORITES_ONLY_KEY, favorites_only.default_reason()),
            (THEME_KEY, theme.default_reason()),
        ] {
            match reason {
                None => {}
                Some(DefaultReason::Absent) => debug!(key, "no stored value; using default"),
                Some(reason) => warn!(key, %reason, "stored value ignored; using default"),
            }
        }

        let report = LoadReport {
            theme: theme.default_reason().cloned(),
            favorites: favorites.default_reason().cloned(),
            category: category.default_reason().cloned(),
            favorites_only: favorites_only.default_reason().cloned(),
        };

        let mut store = Self {
            backend,
            degraded: false,
            selection: SelectionState {
                category: category.into_value(),
                query: String::new(),
                favorites_only: favorites_only.into_value(),
            },
            favorites: favorites.into_value(),
            theme: theme.into_value(),
            report,
        };
        if !theme_stored {
            store.persist_theme();
        }
        store
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// True once a write has failed; state then lives in memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    pub fn set_category(&mut self, category: impl Into<CategorySelection>) {
        self.selection.category = category.into();
        let value = self.selection.category.as_str().to_string();
        self.write(CATEGORY_KEY, &value);
    }

    /// Session-only; the query is never persisted.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.selection.query = query.into();
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.selection.favorites_only = favorites_only;
        self.write(FAVORITES_ONLY_KEY, if favorites_only { "1" } else { "0" });
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Toggle {
        let outcome = self.favorites.toggle(id);
        match serde_json::to_string(&self.favorites) {
            Ok(encoded) => self.write(FAVORITES_KEY, &encoded),
            Err(err) => warn!(error = %err, "failed to encode favorites; not persisted"),
        }
        outcome
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist_theme();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    /// Recompute the visible list for the held selection.
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> VisibleItems<'a> {
        compute_visible(catalog, &self.selection, &self.favorites)
    }

    fn persist_theme(&mut self) {
        let value = self.theme.as_str();
        self.write(THEME_KEY, value);
    }

    fn write(&mut self, key: &str, value: &str) {
        if self.degraded {
            return;
        }
        if let Err(err) = self.backend.set(key, value) {
            warn!(key, error = %err, "persisting failed; continuing in memory for this session");
            self.degraded = true;
        }
    }
}

fn read_key<S: KeyValueStore>(backend: &S, key: &str) -> Result<Option<String>, StoreError> {
    backend.get(key)
}

fn decode_with<T>(
    raw: Result<Option<String>, StoreError>,
    default: impl FnOnce() -> T,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Decoded<T> {
    match raw {
        Ok(None) => Decoded::Defaulted {
            value: default(),
            reason: DefaultReason::Absent,
        },
        Err(err) => Decoded::Defaulted {
            value: default(),
            reason: DefaultReason::Unreadable(err.to_string()),
        },
        Ok(Some(text)) => match parse(&text) {
            Ok(value) => Decoded::Stored(value),
            Err(detail) => Decoded::Defaulted {
                value: default(),
                reason: DefaultReason::Malformed(detail),
            },
        },
    }
}

pub(crate) fn decode_favorites(raw: Result<Option<String>, StoreError>) -> Decoded<FavoriteSet> {
    decode_with(raw, FavoriteSet::new, |text| {
        serde_json::from_str::<FavoriteSet>(text).map_err(|err| err.to_string())
    })
}

pub(crate) fn decode_category(
    raw: Result<Option<String>, StoreError>,
) -> Decoded<CategorySelection> {
    decode_with(raw, CategorySelection::default, |text| {
        if text.is_empty() {
            Err("empty category id".to_string())
        } else {
            Ok(CategorySelection::from(text))
        }
    })
}

pub(crate) fn decode_favorites_only(raw: Result<Option<String>, StoreError>) -> Decoded<bool> {
    // Anything other than "1" reads as off.
    decode_with(raw, || false, |text| Ok(text == "1"))
}

/// `Stored(None)` never occurs; an unknown theme string is `Malformed` and
/// the caller fills in the system preference.
pub(crate) fn decode_theme(raw: Result<Option<String>, StoreError>) -> Decoded<Option<Theme>> {
    decode_with(
        raw,
        || None,
        |text| Theme::try_from(text).map(Some).map_err(|err| err.to_string()),
    )
}
