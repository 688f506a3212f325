use std::sync::Arc;

use crate::color::RatingColors;
use crate::config::DashboardConfig;
use crate::data::aggregate::AggregateOptions;
use crate::data::filter::FilterState;
use crate::data::model::{ProductTable, Rating};
use crate::data::pipeline::{render, Dashboard};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Base table (None until a dataset loads).
    pub dataset: Option<Arc<ProductTable>>,

    /// Current price / rating / search selection.
    pub filters: FilterState,

    /// Output of the last pipeline pass for `filters`.
    pub dashboard: Option<Dashboard>,

    /// Colours for the rating series, fixed per dataset.
    pub rating_colors: RatingColors,

    pub options: AggregateOptions,

    /// Configured `(min, max)` applied on each dataset load.
    pub initial_price_range: Option<(u64, u64)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            filters: FilterState::for_table(&ProductTable::default()),
            dashboard: None,
            rating_colors: RatingColors::default(),
            options: config.aggregate_options(),
            initial_price_range: config.price_range.map(|[min, max]| (min, max)),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset filters and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<ProductTable>) {
        self.filters = self.initial_filters(&dataset);
        self.rating_colors = RatingColors::new(dataset.ratings());
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Full selection, narrowed to the configured price range if there is one.
    fn initial_filters(&self, dataset: &ProductTable) -> FilterState {
        let Some((min, max)) = self.initial_price_range else {
            return FilterState::for_table(dataset);
        };
        match FilterState::new(min, max, dataset.ratings().clone()) {
            Ok(filters) => filters,
            Err(e) => {
                log::warn!("Ignoring configured price range: {e}");
                FilterState::for_table(dataset)
            }
        }
    }

    /// Run the pipeline for the current filters.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.dashboard = Some(render(ds, &self.filters, &self.options));
        }
    }

    /// Toggle a single rating in the selection.
    pub fn toggle_rating(&mut self, rating: Rating) {
        if !self.filters.ratings.remove(&rating) {
            self.filters.ratings.insert(rating);
        }
        self.refilter();
    }

    pub fn select_all_ratings(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.ratings = ds.ratings().clone();
            self.refilter();
        }
    }

    pub fn select_no_ratings(&mut self) {
        self.filters.ratings.clear();
        self.refilter();
    }

    pub fn set_search(&mut self, search: String) {
        self.filters.search = search;
        self.refilter();
    }

    /// Restore the unrestricted selection for the loaded dataset.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = FilterState::for_table(ds);
            self.refilter();
        }
    }

    /// Number of products passing the filters.
    pub fn visible_count(&self) -> usize {
        self.dashboard.as_ref().map_or(0, |d| d.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::product;

    fn loaded_with(config: &DashboardConfig) -> AppState {
        let mut state = AppState::new(config);
        state.set_dataset(Arc::new(ProductTable::from_products(vec![
            product("A", 100, 5.0, 10, 0.0),
            product("B", 200, 4.0, 50, 10.0),
            product("C", 300, 5.0, 5, 20.0),
        ])));
        state
    }

    fn loaded() -> AppState {
        loaded_with(&DashboardConfig::default())
    }

    #[test]
    fn configured_price_range_applies_on_load() {
        let config = DashboardConfig {
            price_range: Some([150, 300]),
            ..DashboardConfig::default()
        };
        let state = loaded_with(&config);
        assert_eq!(state.filters.price_range(), (150, 300));
        assert_eq!(state.visible_count(), 2);
    }

    #[test]
    fn inverted_configured_range_falls_back_to_full_range() {
        let config = DashboardConfig {
            price_range: Some([300, 100]),
            ..DashboardConfig::default()
        };
        let state = loaded_with(&config);
        assert_eq!(state.filters.price_range(), (100, 300));
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn loading_selects_everything() {
        let state = loaded();
        assert_eq!(state.visible_count(), 3);
        assert_eq!(state.filters.price_range(), (100, 300));
    }

    #[test]
    fn rating_toggles_recompute() {
        let mut state = loaded();
        state.toggle_rating(Rating(5.0));
        assert_eq!(state.visible_count(), 1);
        state.select_no_ratings();
        assert_eq!(state.visible_count(), 0);
        state.select_all_ratings();
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn search_and_reset() {
        let mut state = loaded();
        state.set_search("b".to_string());
        assert_eq!(state.visible_count(), 1);
        state.reset_filters();
        assert_eq!(state.visible_count(), 3);
        assert!(state.filters.search.is_empty());
    }
}
