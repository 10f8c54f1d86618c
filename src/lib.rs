pub mod catalog;
pub mod config;
pub mod filter;
pub mod schema_loader;
pub mod selection;
pub mod storage;
pub mod store;

use anyhow::{Result, bail};
use config::{ENV_CATALOG, ENV_ROOT, ENV_SCHEMA};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub use catalog::{Catalog, CatalogIndex, Category, CategoryChip, Item, category_chips};
pub use config::{Config, ConfigOverrides, StateLocation};
pub use filter::{VisibleEntry, VisibleItems, compute_visible, normalize};
pub use selection::{ALL_CATEGORIES, CategorySelection, FavoriteSet, SelectionState, Theme, Toggle};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use store::{Decoded, DefaultReason, LoadReport, SelectionStore};

/// Backend chosen at runtime from `Config::state`.
pub type DynStore = Box<dyn KeyValueStore>;

fn holds_bundled_data(dir: &Path) -> bool {
    dir.join(catalog::DEFAULT_CATALOG_PATH).is_file()
        && dir.join(catalog::CATALOG_SCHEMA_PATH).is_file()
}

/// Directories that may hold the bundled data, in lookup order: the
/// `NAVDECK_ROOT` override, every ancestor of the executable, then the root
/// recorded at build time.
fn root_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = env::var_os(ENV_ROOT).into_iter().map(PathBuf::from).collect();
    let exe_dir = env::current_exe()
        .and_then(fs::canonicalize)
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(exe_dir) = exe_dir {
        candidates.extend(exe_dir.ancestors().map(Path::to_path_buf));
    }
    candidates.extend(option_env!("NAVDECK_ROOT_HINT").map(PathBuf::from));
    candidates
}

fn first_data_root(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .filter(|dir| !dir.as_os_str().is_empty() && holds_bundled_data(dir))
        .find_map(|dir| fs::canonicalize(dir).ok())
}

/// Locate the directory holding the bundled `catalogs/` and `schema/`.
pub fn find_repo_root() -> Result<PathBuf> {
    match first_data_root(root_candidates()) {
        Some(root) => Ok(root),
        None => bail!(
            "Unable to locate the navdeck data directory. Set {ENV_ROOT}, or point {ENV_CATALOG} and {ENV_SCHEMA} at the files directly."
        ),
    }
}

/// Open the persisted selections described by `config`.
///
/// Never fails: an unusable state directory shows up as unreadable keys in
/// the load report and the store degrades to memory on its first write.
pub fn open_selection_store(config: &Config) -> SelectionStore<DynStore> {
    let backend: DynStore = match &config.state {
        StateLocation::Directory(dir) => Box::new(FileStore::new(dir.clone())),
        StateLocation::InMemory => Box::new(MemoryStore::new()),
    };
    SelectionStore::load(backend, config.system_theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_data(dir: &Path) {
        fs::create_dir_all(dir.join("catalogs")).unwrap();
        fs::create_dir_all(dir.join("schema")).unwrap();
        fs::write(dir.join(catalog::DEFAULT_CATALOG_PATH), "[]").unwrap();
        fs::write(dir.join(catalog::CATALOG_SCHEMA_PATH), "{}").unwrap();
    }

    #[test]
    fn data_root_needs_catalog_and_schema() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("catalogs")).unwrap();
        fs::write(temp.path().join(catalog::DEFAULT_CATALOG_PATH), "[]").unwrap();
        assert!(!holds_bundled_data(temp.path()));

        seed_data(temp.path());
        assert!(holds_bundled_data(temp.path()));
    }

    #[test]
    fn first_matching_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        seed_data(&data);
        let nested = data.join("target/debug/deps");
        fs::create_dir_all(&nested).unwrap();

        let candidates = [PathBuf::new(), temp.path().join("missing")]
            .into_iter()
            .chain(nested.ancestors().map(Path::to_path_buf));
        assert_eq!(
            first_data_root(candidates),
            Some(fs::canonicalize(&data).unwrap())
        );
        assert_eq!(first_data_root(vec![temp.path().to_path_buf()]), None);
    }

    #[test]
    fn in_memory_config_opens_fresh_store() {
        let config = Config {
            catalog_path: PathBuf::from("unused.json"),
            schema_path: PathBuf::from("unused.schema.json"),
            state: StateLocation::InMemory,
            system_theme: Some(Theme::Dark),
        };
        let store = open_selection_store(&config);
        assert_eq!(store.theme(), Theme::Dark);
        assert!(store.selection().category.is_all());
        assert!(!store.is_degraded());
    }
}
