use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::item::MapItem;

/// Category chip selection on the map screen.
///
/// The empty selection does not exist: deselecting the last category falls
/// back to `All`, so the map never filters down to nothing by accident.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl CategoryFilter {
    pub fn only<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        if set.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(set)
        }
    }

    /// Toggles `category`. Toggling from `All` selects just that category.
    pub fn toggle(&mut self, category: &str) {
        let mut set = match std::mem::take(self) {
            CategoryFilter::All => BTreeSet::new(),
            CategoryFilter::Only(set) => set,
        };
        if !set.remove(category) {
            set.insert(category.to_string());
        }
        *self = CategoryFilter::only(set);
    }

    pub fn matches(&self, item: &MapItem) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(set) => set.contains(&item.category),
        }
    }

    /// Items passing the filter, in input order.
    pub fn apply(&self, items: &[MapItem]) -> Vec<MapItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Distinct categories present in `items`, sorted.
pub fn available_categories(items: &[MapItem]) -> Vec<String> {
    let set: BTreeSet<&str> = items
        .iter()
        .map(|i| i.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::{CategoryFilter, available_categories};
    use crate::item::MapItem;
    use pretty_assertions::assert_eq;

    fn items() -> Vec<MapItem> {
        vec![
            MapItem::new("1", 0.0, 0.0).with_category("plumbing"),
            MapItem::new("2", 0.0, 0.0).with_category("cleaning"),
            MapItem::new("3", 0.0, 0.0).with_category("plumbing"),
            MapItem::new("4", 0.0, 0.0),
        ]
    }

    #[test]
    fn all_matches_everything() {
        assert_eq!(CategoryFilter::All.apply(&items()).len(), 4);
    }

    #[test]
    fn toggle_from_all_selects_single_category() {
        let mut f = CategoryFilter::All;
        f.toggle("plumbing");
        let kept: Vec<String> = f.apply(&items()).into_iter().map(|i| i.id.to_string()).collect();
        assert_eq!(kept, vec!["1", "3"]);
    }

    #[test]
    fn toggling_last_category_off_returns_to_all() {
        let mut f = CategoryFilter::All;
        f.toggle("cleaning");
        f.toggle("plumbing");
        assert_eq!(f, CategoryFilter::only(["cleaning", "plumbing"]));
        f.toggle("cleaning");
        f.toggle("plumbing");
        assert_eq!(f, CategoryFilter::All);
    }

    #[test]
    fn lists_distinct_categories() {
        assert_eq!(available_categories(&items()), vec!["cleaning", "plumbing"]);
    }
}
