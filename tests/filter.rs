// Visible-list behavior against the sample and bundled catalogs.
mod support;

use anyhow::Result;
use navdeck::{
    Catalog, CatalogIndex, CategorySelection, FavoriteSet, SelectionState, compute_visible,
};
use support::{bundled_catalog_path, sample_catalog, schema_path};

fn selection(category: &str, query: &str, favorites_only: bool) -> SelectionState {
    SelectionState {
        category: CategorySelection::from(category),
        query: query.to_string(),
        favorites_only,
    }
}

fn flattened_ids(catalog: &Catalog) -> Vec<&str> {
    catalog
        .categories
        .iter()
        .flat_map(|c| c.items.iter().map(|it| it.id.as_str()))
        .collect()
}

fn is_subsequence(needle: &[&str], haystack: &[&str]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|id| rest.any(|candidate| candidate == id))
}

#[test]
fn category_name_match_surfaces_design_item() {
    let catalog = sample_catalog();
    let visible = compute_visible(&catalog, &selection("all", "design", false), &FavoriteSet::new());
    assert_eq!(visible.count, 1);
    let entry = &visible.entries[0];
    assert_eq!(entry.category_id, "design");
    assert_eq!(entry.category_name, "Design");
    assert_eq!(entry.item.id, "fig");
}

#[test]
fn category_scope_excludes_matching_item_elsewhere() {
    let catalog = sample_catalog();
    let visible = compute_visible(&catalog, &selection("dev", "fig", false), &FavoriteSet::new());
    assert!(visible.is_empty());
    assert_eq!(visible.count, 0);
}

#[test]
fn lowercase_query_matches_mixed_case_title() {
    let catalog = sample_catalog();
    let visible = compute_visible(&catalog, &selection("all", "git", false), &FavoriteSet::new());
    let ids: Vec<_> = visible.item_ids().collect();
    assert_eq!(ids, vec!["gh"]);
}

#[test]
fn favorites_only_with_no_favorites_is_empty_for_every_scope() {
    let catalog = sample_catalog();
    for category in ["all", "dev", "design"] {
        for query in ["", "g", "design"] {
            let visible =
                compute_visible(&catalog, &selection(category, query, true), &FavoriteSet::new());
            assert!(visible.is_empty(), "{category}/{query} should be empty");
        }
    }
}

#[test]
fn results_are_ordered_subsequences_of_the_catalog() -> Result<()> {
    let index = CatalogIndex::load(&bundled_catalog_path(), &schema_path())?;
    let catalog = index.catalog();
    let all_ids = flattened_ids(catalog);
    let favorites: FavoriteSet = all_ids.iter().step_by(2).copied().collect();

    let mut scopes = vec!["all".to_string(), "missing".to_string()];
    scopes.extend(catalog.categories.iter().map(|c| c.id.clone()));

    for scope in &scopes {
        for query in ["", "  ", "e", "RUST", "tool", "zzz"] {
            for favorites_only in [false, true] {
                let state = selection(scope, query, favorites_only);
                let visible = compute_visible(catalog, &state, &favorites);
                let ids: Vec<_> = visible.item_ids().collect();
                assert!(
                    is_subsequence(&ids, &all_ids),
                    "{scope}/{query}/{favorites_only} reordered: {ids:?}"
                );
                assert_eq!(visible.count, ids.len());
                for entry in &visible.entries {
                    assert!(state.category.includes(entry.category_id));
                    if favorites_only {
                        assert!(favorites.contains(&entry.item.id));
                    }
                }
                assert_eq!(visible, compute_visible(catalog, &state, &favorites));
            }
        }
    }
    Ok(())
}

#[test]
fn all_scope_without_filters_returns_everything() -> Result<()> {
    let index = CatalogIndex::load(&bundled_catalog_path(), &schema_path())?;
    let catalog = index.catalog();
    let visible = compute_visible(catalog, &SelectionState::default(), &FavoriteSet::new());
    assert_eq!(visible.item_ids().collect::<Vec<_>>(), flattened_ids(catalog));
    Ok(())
}
