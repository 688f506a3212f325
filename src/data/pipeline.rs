use super::aggregate::{aggregate, AggregateOptions, Aggregates};
use super::filter::{apply, FilterState};
use super::format::{summary_metrics, Metric};
use super::model::ProductTable;

/// Everything the renderer shows for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Filtered products, in base-table order.
    pub rows: ProductTable,
    pub aggregates: Aggregates,
    pub metrics: [Metric; 4],
}

/// Filter the base table and aggregate the result.  Pure: the same inputs
/// always produce the same dashboard.
pub fn render(base: &ProductTable, state: &FilterState, options: &AggregateOptions) -> Dashboard {
    let rows = apply(base, state);
    let aggregates = aggregate(&rows, options);
    let metrics = summary_metrics(&aggregates.summary);
    log::debug!("Rendered {} of {} products", rows.len(), base.len());
    Dashboard {
        rows,
        aggregates,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::format::NO_DATA;
    use crate::data::model::product;

    fn scenario() -> ProductTable {
        ProductTable::from_products(vec![
            product("A", 100, 5.0, 10, 0.0),
            product("B", 200, 4.0, 50, 10.0),
            product("C", 300, 5.0, 5, 20.0),
        ])
    }

    #[test]
    fn renders_scenario() {
        let base = scenario();
        let mut state = FilterState::for_table(&base);
        state.set_price_max(250);

        let dash = render(&base, &state, &AggregateOptions::default());
        assert_eq!(dash.rows.len(), 2);
        assert_eq!(dash.aggregates.summary.mean_price, Some(150.0));
        assert_eq!(dash.aggregates.top_reviewed[0].name, "B");
        assert_eq!(dash.metrics[0].display(), "IDR 150");
    }

    #[test]
    fn render_is_repeatable() {
        let base = scenario();
        let state = FilterState::for_table(&base).with_search("b");
        let options = AggregateOptions::default();
        assert_eq!(render(&base, &state, &options), render(&base, &state, &options));
    }

    #[test]
    fn empty_selection_renders_no_data() {
        let base = scenario();
        let state = FilterState::new(0, 1_000, BTreeSet::new()).unwrap();
        let dash = render(&base, &state, &AggregateOptions::default());
        assert!(dash.rows.is_empty());
        assert!(dash.metrics.iter().all(|m| m.display() == NO_DATA));
    }

    #[test]
    fn search_narrows_charts_and_table_alike() {
        let base = scenario();
        let state = FilterState::for_table(&base).with_search("c");
        let dash = render(&base, &state, &AggregateOptions::default());
        assert_eq!(dash.rows.len(), 1);
        assert_eq!(dash.aggregates.price_histogram.total(), 1);
        assert_eq!(dash.aggregates.summary.mean_price, Some(300.0));
    }
}
