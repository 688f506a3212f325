use std::collections::BTreeSet;

use super::error::FilterError;
use super::model::{Product, ProductTable, Rating};

// ---------------------------------------------------------------------------
// Filter predicate: price range, selected ratings, name search
// ---------------------------------------------------------------------------

/// User-selected constraints.  All predicates must hold for a product to be
/// kept.  The price range is inclusive at both ends and never inverted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    price_min: u64,
    price_max: u64,
    /// Ratings to keep.  An empty set keeps nothing.
    pub ratings: BTreeSet<Rating>,
    /// Case-insensitive substring of `name`.  Blank means no constraint.
    pub search: String,
}

impl FilterState {
    pub fn new(price_min: u64, price_max: u64, ratings: BTreeSet<Rating>) -> Result<Self, FilterError> {
        if price_min > price_max {
            return Err(FilterError::InvalidPriceRange {
                min: price_min,
                max: price_max,
            });
        }
        Ok(Self {
            price_min,
            price_max,
            ratings,
            search: String::new(),
        })
    }

    /// A state that keeps every product of `table` (full price range, all
    /// ratings, no search).
    pub fn for_table(table: &ProductTable) -> Self {
        let (price_min, price_max) = table.price_bounds().unwrap_or((0, 0));
        Self {
            price_min,
            price_max,
            ratings: table.ratings().clone(),
            search: String::new(),
        }
    }

    #[cfg(test)]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn price_range(&self) -> (u64, u64) {
        (self.price_min, self.price_max)
    }

    /// Move the lower bound; pushes the upper bound along if it would cross.
    pub fn set_price_min(&mut self, value: u64) {
        self.price_min = value;
        self.price_max = self.price_max.max(value);
    }

    /// Move the upper bound; pushes the lower bound along if it would cross.
    pub fn set_price_max(&mut self, value: u64) {
        self.price_max = value;
        self.price_min = self.price_min.min(value);
    }

    /// Lowercased search needle, `None` when the search is blank.  Surrounding
    /// whitespace is part of a non-blank needle.
    fn needle(&self) -> Option<String> {
        (!self.search.trim().is_empty()).then(|| self.search.to_lowercase())
    }

    fn keeps(&self, product: &Product, needle: Option<&str>) -> bool {
        (self.price_min..=self.price_max).contains(&product.price)
            && self.ratings.contains(&product.rating)
            && needle.map_or(true, |n| product.name.to_lowercase().contains(n))
    }
}

/// Return indices of products that pass all predicates, in table order.
pub fn filtered_indices(table: &ProductTable, state: &FilterState) -> Vec<usize> {
    if state.ratings.is_empty() {
        // Nothing selected → hide everything
        return Vec::new();
    }
    let needle = state.needle();
    table
        .iter()
        .enumerate()
        .filter(|(_, p)| state.keeps(p, needle.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// Derive the filtered view of `table`.  The input is left untouched and the
/// relative order of the kept products is preserved.
pub fn apply(table: &ProductTable, state: &FilterState) -> ProductTable {
    let products = filtered_indices(table, state)
        .into_iter()
        .filter_map(|i| table.get(i).cloned())
        .collect();
    ProductTable::from_products(products)
}
