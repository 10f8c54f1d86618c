use crate::catalog::Catalog;
use crate::selection::{ALL_CATEGORIES, CategorySelection};
use serde::Serialize;

pub const ALL_CHIP_ICON: &str = "fa-solid fa-border-all";

/// One entry of the category bar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryChip<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub icon: &'a str,
    pub active: bool,
}

/// The synthetic "all" chip followed by every category in catalog order.
pub fn category_chips<'a>(
    catalog: &'a Catalog,
    all_label: &'a str,
    current: &CategorySelection,
) -> Vec<CategoryChip<'a>> {
    let all = CategoryChip {
        id: ALL_CATEGORIES,
        name: all_label,
        icon: ALL_CHIP_ICON,
        active: current.is_all(),
    };
    std::iter::once(all)
        .chain(catalog.categories.iter().map(|category| CategoryChip {
            id: category.id.as_str(),
            name: category.name.as_str(),
            icon: category.icon(),
            active: !current.is_all() && current.as_str() == category.id,
        }))
        .collect()
}
