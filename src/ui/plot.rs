use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::RatingColors;
use crate::data::aggregate::{Histogram, ScatterPoint};
use crate::data::format::NO_DATA;
use crate::data::model::{Product, Rating};

const CHART_HEIGHT: f32 = 260.0;
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
/// Longest product name shown on the top-N axis.
const MAX_LABEL_CHARS: usize = 40;

/// Plots are read-only here; scrolling belongs to the page.
fn base_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_boxed_zoom(true)
}

fn no_data(ui: &mut Ui) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(NO_DATA);
        });
    });
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, id: &str, histogram: &Histogram, x_label: &str) {
    if histogram.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = histogram
        .bars()
        // Leave a small gap between bars.
        .map(|(centre, width, count)| Bar::new(centre, count as f64).width(width * 0.9))
        .collect();

    base_plot(id)
        .x_axis_label(x_label)
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Reviews vs price scatter, one series per rating
// ---------------------------------------------------------------------------

pub fn review_scatter(ui: &mut Ui, points: &[ScatterPoint], colors: &RatingColors) {
    if points.is_empty() {
        no_data(ui);
        return;
    }

    let mut by_rating: BTreeMap<Rating, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        by_rating
            .entry(p.rating)
            .or_default()
            .push([p.price, p.count_review]);
    }

    base_plot("review_scatter")
        .legend(Legend::default())
        .x_axis_label("Price (IDR)")
        .y_axis_label("countReview")
        .show(ui, |plot_ui| {
            for (rating, series) in by_rating {
                let points = Points::new(PlotPoints::from(series))
                    .name(format!("{rating} ⭐"))
                    .color(colors.color_for(rating))
                    .radius(2.5);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

pub fn rating_bars(ui: &mut Ui, counts: &[(Rating, usize)], colors: &RatingColors) {
    if counts.is_empty() {
        no_data(ui);
        return;
    }

    // Ratings may be fractional, so size bars by the closest pair.
    let width = counts
        .windows(2)
        .map(|w| w[1].0.value() - w[0].0.value())
        .fold(1.0_f64, f64::min)
        * 0.8;

    let bars: Vec<Bar> = counts
        .iter()
        .map(|&(rating, count)| {
            Bar::new(rating.value(), count as f64)
                .width(width)
                .name(format!("{rating} ⭐"))
                .fill(colors.color_for(rating))
        })
        .collect();

    base_plot("rating_bars")
        .x_axis_label("Rating")
        .y_axis_label("Number of Products")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Top reviewed products (horizontal bars, most reviewed on top)
// ---------------------------------------------------------------------------

pub fn top_reviewed(ui: &mut Ui, products: &[Product]) {
    if products.is_empty() {
        no_data(ui);
        return;
    }

    let n = products.len();
    let labels: Vec<String> = products
        .iter()
        .rev()
        .map(|p| truncate(&p.name, MAX_LABEL_CHARS))
        .collect();

    let bars: Vec<Bar> = products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::new((n - 1 - i) as f64, p.count_review as f64)
                .width(0.7)
                .name(&p.name)
        })
        .collect();

    base_plot("top_reviewed")
        .x_axis_label("countReview")
        .y_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > f64::EPSILON || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).horizontal());
        });
}

fn truncate(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut short: String = name.chars().take(max_chars - 1).collect();
    short.push('…');
    short
}
