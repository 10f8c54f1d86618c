//! Command-line front end for the link directory.
//!
//! Each invocation loads the catalog and the persisted selections, applies
//! at most one mutation, recomputes the visible list and prints it. The
//! search query is per-invocation (`list --query`) because it is never
//! persisted.
//!
//! Usage:
//!   navdeck list --query git
//!   navdeck category design
//!   navdeck favorite figma
//!   navdeck favorites-only on
//!   navdeck theme toggle

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use navdeck::{
    CatalogIndex, Config, ConfigOverrides, DynStore, SelectionStore, Theme, Toggle,
    VisibleItems, category_chips, config::ENV_LOG, open_selection_store,
};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "navdeck")]
#[command(about = "Browse a categorized link catalog with search, favorites and saved filters")]
struct Cli {
    /// Catalog file (defaults to NAVDECK_CATALOG, then the bundled catalog).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Directory for persisted selections (defaults to NAVDECK_STATE_DIR).
    #[arg(long, global = true, conflicts_with = "in_memory")]
    state_dir: Option<PathBuf>,
    /// Keep selections in memory only for this invocation.
    #[arg(long, global = true)]
    in_memory: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the visible links for the saved selection.
    List {
        /// Free-text filter over title, description and category name.
        #[arg(long, short, default_value = "")]
        query: String,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the category bar.
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// Select a category id, or `all`.
    Category { id: String },
    /// Show only favorited links.
    FavoritesOnly { mode: Switch },
    /// Add or remove an item from favorites.
    Favorite { id: String },
    /// Show, set or toggle the color theme.
    Theme { mode: Option<ThemeArg> },
    /// Print persisted selections and how they were loaded.
    State {
        #[arg(long)]
        json: bool,
    },
    /// Validate the catalog against the schema and id rules.
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Switch {
    On,
    Off,
    Toggle,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

const ALL_LABEL: &str = "All";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env(ConfigOverrides {
        catalog: cli.catalog,
        state_dir: cli.state_dir,
        in_memory: cli.in_memory,
    })?;

    let index = CatalogIndex::load(&config.catalog_path, &config.schema_path)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

    let mut store = open_selection_store(&config);

    match cli.command {
        Command::List { query, json } => {
            store.set_query(query);
            print_visible(&store.visible(index.catalog()), json)?;
        }
        Command::Categories { json } => {
            let chips = category_chips(index.catalog(), ALL_LABEL, &store.selection().category);
            if json {
                println!("{}", serde_json::to_string_pretty(&chips)?);
            } else {
                for chip in chips {
                    let marker = if chip.active { "*" } else { " " };
                    println!("{marker} {:<16} {}", chip.id, chip.name);
                }
            }
        }
        Command::Category { id } => {
            if id != navdeck::ALL_CATEGORIES && !index.contains_category(&id) {
                tracing::warn!(category = %id, "category not in catalog; nothing will match");
            }
            store.set_category(id);
            print_visible(&store.visible(index.catalog()), false)?;
        }
        Command::FavoritesOnly { mode } => {
            let next = match mode {
                Switch::On => true,
                Switch::Off => false,
                Switch::Toggle => !store.selection().favorites_only,
            };
            store.set_favorites_only(next);
            println!("favorites only: {}", if next { "on" } else { "off" });
            print_visible(&store.visible(index.catalog()), false)?;
        }
        Command::Favorite { id } => {
            if !index.contains_item(&id) {
                bail!("unknown item id '{id}'");
            }
            match store.toggle_favorite(&id) {
                Toggle::Added => println!("added to favorites: {id}"),
                Toggle::Removed => println!("removed from favorites: {id}"),
            }
            print_visible(&store.visible(index.catalog()), false)?;
        }
        Command::Theme { mode } => {
            let theme = match mode {
                None => store.theme(),
                Some(ThemeArg::Toggle) => store.toggle_theme(),
                Some(ThemeArg::Dark) => set_theme(&mut store, Theme::Dark),
                Some(ThemeArg::Light) => set_theme(&mut store, Theme::Light),
            };
            println!("{theme}");
        }
        Command::State { json } => print_state(&store, &index, json)?,
        Command::Validate => {
            let catalog = index.catalog();
            println!(
                "ok: {} ({} categories, {} items)",
                config.catalog_path.display(),
                catalog.categories.len(),
                catalog.item_count()
            );
        }
    }

    if store.is_degraded() {
        eprintln!("warning: selections could not be saved; changes last for this run only");
    }
    Ok(())
}

fn set_theme(store: &mut SelectionStore<DynStore>, theme: Theme) -> Theme {
    store.set_theme(theme);
    theme
}

fn print_visible(visible: &VisibleItems<'_>, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(visible)?);
        return Ok(());
    }
    println!("{}", visible.result_count_label());
    if visible.is_empty() {
        println!("No matching links.");
        return Ok(());
    }
    for entry in &visible.entries {
        let item = entry.item;
        println!("{}  {}", item.title, item.url);
        if item.desc.is_empty() {
            println!("    [{}] #{}", entry.category_name, item.id);
        } else {
            println!("    {}  [{}] #{}", item.desc, entry.category_name, item.id);
        }
    }
    Ok(())
}

fn print_state(store: &SelectionStore<DynStore>, index: &CatalogIndex, as_json: bool) -> Result<()> {
    let selection = store.selection();
    let favorites: Vec<&str> = store.favorites().iter().collect();
    let stale = store.favorites().stale_ids(|id| index.contains_item(id));
    let visible = store.visible(index.catalog());

    if as_json {
        let value = json!({
            "category": selection.category.as_str(),
            "favorites_only": selection.favorites_only,
            "theme": store.theme().as_str(),
            "favorites": favorites,
            "stale_favorites": stale,
            "visible_count": visible.count,
            "degraded": store.is_degraded(),
            "load_report": store.load_report(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("category:       {}", selection.category);
    println!(
        "favorites only: {}",
        if selection.favorites_only { "on" } else { "off" }
    );
    println!("theme:          {}", store.theme());
    println!("favorites:      {}", favorites.join(", "));
    if !stale.is_empty() {
        println!("stale:          {}", stale.join(", "));
    }
    println!("visible:        {}", visible.count);
    for (key, reason) in store.load_report().failures() {
        println!("defaulted {key}: {reason}");
    }
    Ok(())
}
