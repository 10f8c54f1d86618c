#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use navdeck::{Catalog, CatalogIndex};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn schema_path() -> PathBuf {
    repo_root().join(navdeck::catalog::CATALOG_SCHEMA_PATH)
}

pub fn bundled_catalog_path() -> PathBuf {
    repo_root().join(navdeck::catalog::DEFAULT_CATALOG_PATH)
}

/// Two categories, one item each: the worked example from the docs.
pub fn sample_catalog_json() -> Value {
    json!([
        {"id": "dev", "name": "Dev Tools", "items": [
            {"id": "gh", "title": "GitHub", "desc": "Code hosting", "url": "https://github.com"}
        ]},
        {"id": "design", "name": "Design", "items": [
            {"id": "fig", "title": "Figma", "desc": "UI design tool", "url": "https://figma.com"}
        ]}
    ])
}

pub fn sample_catalog() -> Catalog {
    Catalog::from_value(sample_catalog_json()).expect("sample catalog parses")
}

// Temp directory holding a catalog file and a state directory; removed on drop.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("creating temp workspace")?,
        })
    }

    pub fn with_catalog(catalog: &Value) -> Result<Self> {
        let workspace = Self::new()?;
        workspace.write_catalog(catalog)?;
        Ok(workspace)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("catalog.json")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_dir().join(navdeck::storage::STATE_FILE_NAME)
    }

    pub fn write_catalog(&self, catalog: &Value) -> Result<()> {
        fs::write(self.catalog_path(), serde_json::to_vec_pretty(catalog)?)
            .context("writing catalog fixture")
    }

    pub fn write_state(&self, state: &Value) -> Result<()> {
        fs::create_dir_all(self.state_dir())?;
        fs::write(self.state_file(), serde_json::to_vec_pretty(state)?)
            .context("writing state fixture")
    }

    pub fn read_state(&self) -> Result<Value> {
        let data = fs::read_to_string(self.state_file()).context("reading state file")?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn index(&self) -> Result<CatalogIndex> {
        CatalogIndex::load(&self.catalog_path(), &schema_path())
    }

    /// Run the CLI against this workspace with a pinned environment.
    pub fn navdeck(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_navdeck"));
        cmd.arg("--catalog")
            .arg(self.catalog_path())
            .arg("--state-dir")
            .arg(self.state_dir())
            .args(args)
            .env("NAVDECK_SCHEMA", schema_path())
            .env("NAVDECK_COLOR_SCHEME", "light")
            .env_remove("NAVDECK_LOG")
            .env_remove("COLORFGBG");
        cmd.output().context("running navdeck")
    }
}

pub fn stdout_of(output: &Output) -> Result<String> {
    if !output.status.success() {
        bail!(
            "navdeck failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
