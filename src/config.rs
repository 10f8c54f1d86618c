//! Runtime configuration for the CLI.
//!
//! Precedence is command-line flag, then environment variable, then the
//! bundled defaults under the repository root. Environment access goes
//! through a lookup function so tests never mutate the process env.

use crate::catalog::{CATALOG_SCHEMA_PATH, DEFAULT_CATALOG_PATH};
use crate::find_repo_root;
use crate::selection::Theme;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const ENV_CATALOG: &str = "NAVDECK_CATALOG";
pub const ENV_SCHEMA: &str = "NAVDECK_SCHEMA";
pub const ENV_STATE_DIR: &str = "NAVDECK_STATE_DIR";
pub const ENV_COLOR_SCHEME: &str = "NAVDECK_COLOR_SCHEME";
pub const ENV_LOG: &str = "NAVDECK_LOG";
pub const ENV_ROOT: &str = "NAVDECK_ROOT";

/// Where persisted selections live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateLocation {
    Directory(PathBuf),
    /// Nothing survives the process.
    InMemory,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub in_memory: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub schema_path: PathBuf,
    pub state: StateLocation,
    pub system_theme: Option<Theme>,
}

impl Config {
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve(overrides, |name| match env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        })
    }

    pub fn resolve(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env_catalog = lookup(ENV_CATALOG).map(PathBuf::from);
        let env_schema = lookup(ENV_SCHEMA).map(PathBuf::from);

        let (catalog_path, schema_path) = match (overrides.catalog.or(env_catalog), env_schema) {
            (Some(catalog), Some(schema)) => (catalog, schema),
            (catalog, schema) => {
                let root = find_repo_root().context("locating bundled catalog and schema")?;
                (
                    catalog.unwrap_or_else(|| root.join(DEFAULT_CATALOG_PATH)),
                    schema.unwrap_or_else(|| root.join(CATALOG_SCHEMA_PATH)),
                )
            }
        };

        let state = if overrides.in_memory {
            StateLocation::InMemory
        } else if let Some(dir) = overrides.state_dir {
            StateLocation::Directory(dir)
        } else {
            default_state_location(&lookup)
        };

        Ok(Self {
            catalog_path,
            schema_path,
            state,
            system_theme: system_theme(&lookup),
        })
    }
}

fn default_state_location(lookup: &impl Fn(&str) -> Option<String>) -> StateLocation {
    if let Some(dir) = lookup(ENV_STATE_DIR) {
        return StateLocation::Directory(PathBuf::from(dir));
    }
    if let Some(xdg) = lookup("XDG_STATE_HOME") {
        return StateLocation::Directory(PathBuf::from(xdg).join("navdeck"));
    }
    match lookup("HOME") {
        Some(home) => StateLocation::Directory(PathBuf::from(home).join(".local/state/navdeck")),
        None => StateLocation::InMemory,
    }
}

/// The platform color-scheme preference, if one can be determined.
///
/// An explicit `NAVDECK_COLOR_SCHEME` wins; otherwise the terminal's
/// `COLORFGBG` background index is used (0-6 and 8 are dark backgrounds).
pub fn system_theme(lookup: &impl Fn(&str) -> Option<String>) -> Option<Theme> {
    if let Some(explicit) = lookup(ENV_COLOR_SCHEME) {
        if let Ok(theme) = Theme::try_from(explicit.trim().to_ascii_lowercase().as_str()) {
            return Some(theme);
        }
    }
    let colorfgbg = lookup("COLORFGBG")?;
    let background: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(match background {
        0..=6 | 8 => Theme::Dark,
        _ => Theme::Light,
    })
}
