use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader;
use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Price range ----
            ui.strong("Price Range (IDR)");
            let (lo, hi) = dataset.price_bounds().unwrap_or((0, 0));
            let (mut min, mut max) = state.filters.price_range();
            let mut changed = false;

            if ui
                .add(egui::Slider::new(&mut min, lo..=hi).prefix("IDR ").text("min"))
                .changed()
            {
                state.filters.set_price_min(min);
                changed = true;
            }
            if ui
                .add(egui::Slider::new(&mut max, lo..=hi).prefix("IDR ").text("max"))
                .changed()
            {
                state.filters.set_price_max(max);
                changed = true;
            }
            if changed {
                state.refilter();
            }
            ui.separator();

            // ---- Ratings ----
            let n_selected = state.filters.ratings.len();
            let n_total = dataset.ratings().len();
            ui.strong(format!("Ratings  ({n_selected}/{n_total})"));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_ratings();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_ratings();
                }
            });

            for &rating in dataset.ratings() {
                let mut checked = state.filters.ratings.contains(&rating);
                let text = RichText::new(format!("{rating} ⭐"))
                    .color(state.rating_colors.color_for(rating));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_rating(rating);
                }
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – charts, metrics and the product table
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("👕 Tokopedia Men's Clothing Analysis");
    ui.label("Interactive dashboard for analyzing men's clothing products on Tokopedia");
    ui.add_space(8.0);

    let Some(dash) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open…)");
        });
        return;
    };
    let agg = &dash.aggregates;
    let colors = &state.rating_colors;

    ui.columns(2, |cols| {
        cols[0].strong("Price Distribution");
        plot::histogram(&mut cols[0], "price_hist", &agg.price_histogram, "Price (IDR)");
        cols[1].strong("Reviews vs Price");
        plot::review_scatter(&mut cols[1], &agg.review_scatter, colors);
    });

    ui.columns(2, |cols| {
        cols[0].strong("Discount Distribution");
        plot::histogram(
            &mut cols[0],
            "discount_hist",
            &agg.discount_histogram,
            "Discount (%)",
        );
        cols[1].strong("Rating Distribution");
        plot::rating_bars(&mut cols[1], &agg.rating_counts, colors);
    });

    ui.strong(format!("Top {} Most Reviewed Products", state.options.top_n));
    plot::top_reviewed(ui, &agg.top_reviewed);
    ui.separator();

    ui.strong("Summary Metrics");
    ui.columns(dash.metrics.len(), |cols| {
        for (col, metric) in cols.iter_mut().zip(&dash.metrics) {
            col.label(metric.label);
            col.heading(metric.display());
        }
    });
    ui.separator();

    ui.strong("Product Data");
    let mut search = state.filters.search.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut search).hint_text("Search products by name"))
        .changed()
    {
        state.set_search(search);
    }

    if let Some(dash) = &state.dashboard {
        table::product_table(ui, &dash.rows);
    }

    ui.separator();
    ui.label("Data source: Tokopedia");
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} products loaded, {} visible",
                ds.len(),
                state.visible_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open product listing")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} products from {} ({} distinct ratings)",
                    dataset.len(),
                    path.display(),
                    dataset.ratings().len()
                );
                state.set_dataset(Arc::new(dataset));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
