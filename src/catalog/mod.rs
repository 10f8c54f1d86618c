//! Link catalog wiring.
//!
//! This module wraps the link catalog on disk (for example
//! `catalogs/default.json`) so the CLI can load a validated snapshot. Types
//! here mirror the catalog schema; callers use `CatalogIndex` when they need
//! id lookups and `category_chips` to build the category bar.

pub mod chips;
pub mod index;
pub mod model;

pub use chips::{ALL_CHIP_ICON, CategoryChip, category_chips};
pub use index::CatalogIndex;
pub use model::{Catalog, Category, Item, load_catalog_from_path};

/// Default relative path to the bundled link catalog.
pub const DEFAULT_CATALOG_PATH: &str = "catalogs/default.json";

/// Relative path to the JSON Schema the catalog is validated against.
pub const CATALOG_SCHEMA_PATH: &str = "schema/nav_catalog.schema.json";

/// Schema marker accepted in the object form of a catalog file.
pub const CATALOG_SCHEMA_VERSION: &str = "nav_catalog_v1";
