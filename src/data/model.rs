use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Rating – a discrete score used as a grouping / filter key
// ---------------------------------------------------------------------------

/// A product rating.  The source data does not pin the domain down (it may be
/// whole stars or fractional), so the value is kept as an `f64` and ordered
/// with `total_cmp` to make it usable as a `BTreeSet` / `BTreeMap` key.
#[derive(Debug, Clone, Copy)]
pub struct Rating(pub f64);

impl Rating {
    pub fn value(self) -> f64 {
        self.0
    }
}

// -- Manual Eq/Ord so we can put Rating in BTreeSet --

impl PartialEq for Rating {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rating {}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for Rating {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole-star ratings print without a trailing ".0".
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Product – one row of the listing table
// ---------------------------------------------------------------------------

/// A single product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    /// Price in IDR (no minor unit).
    pub price: u64,
    pub rating: Rating,
    pub count_review: u64,
    /// Discount in percent, 0–100.
    pub discount_percentage: f64,
}

// ---------------------------------------------------------------------------
// ProductTable – an ordered, immutable collection of products
// ---------------------------------------------------------------------------

/// An ordered table of products with pre-computed column indices.
///
/// Both the loaded base table and every filtered view are `ProductTable`s;
/// neither is mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductTable {
    products: Vec<Product>,
    /// Sorted set of distinct ratings present in `products`.
    ratings: BTreeSet<Rating>,
    /// `(min, max)` price, `None` for an empty table.
    price_bounds: Option<(u64, u64)>,
}

impl ProductTable {
    /// Build column indices from the loaded products.
    pub fn from_products(products: Vec<Product>) -> Self {
        let ratings = products.iter().map(|p| p.rating).collect();
        let price_bounds = products.iter().fold(None, |acc, p| match acc {
            None => Some((p.price, p.price)),
            Some((lo, hi)) => Some((lo.min(p.price), hi.max(p.price))),
        });
        ProductTable {
            products,
            ratings,
            price_bounds,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn ratings(&self) -> &BTreeSet<Rating> {
        &self.ratings
    }

    pub fn price_bounds(&self) -> Option<(u64, u64)> {
        self.price_bounds
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }
}

impl<'a> IntoIterator for &'a ProductTable {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
pub(crate) fn product(name: &str, price: u64, rating: f64, count_review: u64, discount: f64) -> Product {
    Product {
        name: name.to_string(),
        price,
        rating: Rating(rating),
        count_review,
        discount_percentage: discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_ratings_and_price_bounds() {
        let table = ProductTable::from_products(vec![
            product("A", 300, 5.0, 1, 0.0),
            product("B", 100, 4.5, 2, 0.0),
            product("C", 200, 5.0, 3, 0.0),
        ]);
        let ratings: Vec<f64> = table.ratings().iter().map(|r| r.value()).collect();
        assert_eq!(ratings, vec![4.5, 5.0]);
        assert_eq!(table.price_bounds(), Some((100, 300)));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let table = ProductTable::from_products(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.price_bounds(), None);
        assert!(table.ratings().is_empty());
    }

    #[test]
    fn rating_display_drops_trailing_zero() {
        assert_eq!(Rating(5.0).to_string(), "5");
        assert_eq!(Rating(4.5).to_string(), "4.5");
    }
}
