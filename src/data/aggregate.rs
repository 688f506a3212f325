use std::collections::BTreeMap;

use super::model::{Product, ProductTable, Rating};

pub const PRICE_BINS: usize = 50;
pub const DISCOUNT_BINS: usize = 30;
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram.  `edges` has one more entry than `counts`; bin `i`
/// covers `[edges[i], edges[i + 1])`, the last bin also includes its right
/// edge.  An empty histogram has no edges and no counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width bins spanning their min/max.
    pub fn equal_width(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        }) else {
            return Self::default();
        };

        // A single distinct value gets a unit-wide span centred on it.
        let (lo, hi) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let width = (hi - lo) / bins as f64;

        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self { edges, counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(bin centre, bin width, count)` for each bin, for bar plotting.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &count)| ((w[0] + w[1]) / 2.0, w[1] - w[0], count))
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Arithmetic means over a table.  Every field is `None` when the table is
/// empty, which the renderer shows as "no data".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub mean_price: Option<f64>,
    pub mean_rating: Option<f64>,
    pub mean_count_review: Option<f64>,
    pub mean_discount: Option<f64>,
}

impl Summary {
    pub fn of(table: &ProductTable) -> Self {
        let column_mean = |f: fn(&Product) -> f64| mean(table.iter().map(f));
        Self {
            mean_price: column_mean(|p| p.price as f64),
            mean_rating: column_mean(|p| p.rating.value()),
            mean_count_review: column_mean(|p| p.count_review as f64),
            mean_discount: column_mean(|p| p.discount_percentage),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Grouped counts and rankings
// ---------------------------------------------------------------------------

/// Number of products per distinct rating, ascending by rating.
pub fn rating_counts(table: &ProductTable) -> Vec<(Rating, usize)> {
    let mut counts: BTreeMap<Rating, usize> = BTreeMap::new();
    for p in table {
        *counts.entry(p.rating).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// The `n` most reviewed products, most reviewed first.  Products with equal
/// review counts keep their table order.
pub fn top_reviewed(table: &ProductTable, n: usize) -> Vec<Product> {
    let mut ranked: Vec<&Product> = table.iter().collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.count_review.cmp(&a.count_review));
    ranked.into_iter().take(n).cloned().collect()
}

/// One point of the reviews-vs-price scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub price: f64,
    pub count_review: f64,
    pub rating: Rating,
    pub name: String,
}

pub fn review_scatter(table: &ProductTable) -> Vec<ScatterPoint> {
    table
        .iter()
        .map(|p| ScatterPoint {
            price: p.price as f64,
            count_review: p.count_review as f64,
            rating: p.rating,
            name: p.name.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregates – everything the charts need from one filtered table
// ---------------------------------------------------------------------------

/// Bin counts and ranking length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub price_bins: usize,
    pub discount_bins: usize,
    pub top_n: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            price_bins: PRICE_BINS,
            discount_bins: DISCOUNT_BINS,
            top_n: TOP_N,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub price_histogram: Histogram,
    pub discount_histogram: Histogram,
    pub rating_counts: Vec<(Rating, usize)>,
    pub top_reviewed: Vec<Product>,
    pub review_scatter: Vec<ScatterPoint>,
    pub summary: Summary,
}

pub fn aggregate(table: &ProductTable, options: &AggregateOptions) -> Aggregates {
    let prices: Vec<f64> = table.iter().map(|p| p.price as f64).collect();
    let discounts: Vec<f64> = table.iter().map(|p| p.discount_percentage).collect();

    Aggregates {
        price_histogram: Histogram::equal_width(&prices, options.price_bins),
        discount_histogram: Histogram::equal_width(&discounts, options.discount_bins),
        rating_counts: rating_counts(table),
        top_reviewed: top_reviewed(table, options.top_n),
        review_scatter: review_scatter(table),
        summary: Summary::of(table),
    }
}
