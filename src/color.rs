use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Rating;

// ---------------------------------------------------------------------------
// Rating palette
// ---------------------------------------------------------------------------

/// `n` colours on a red → green hue ramp, lowest first.
pub fn rating_ramp(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![hsl_to_color32(120.0)],
        _ => (0..n)
            .map(|i| hsl_to_color32(120.0 * i as f32 / (n - 1) as f32))
            .collect(),
    }
}

fn hsl_to_color32(hue: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, 0.7, 0.5).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: rating → Color32
// ---------------------------------------------------------------------------

/// Maps every distinct rating of the base table to a colour, so a rating
/// keeps its colour while filters change.
#[derive(Debug, Clone, Default)]
pub struct RatingColors {
    mapping: BTreeMap<Rating, Color32>,
}

impl RatingColors {
    pub fn new(ratings: &BTreeSet<Rating>) -> Self {
        let mapping = ratings
            .iter()
            .copied()
            .zip(rating_ramp(ratings.len()))
            .collect();
        RatingColors { mapping }
    }

    pub fn color_for(&self, rating: Rating) -> Color32 {
        self.mapping.get(&rating).copied().unwrap_or(Color32::GRAY)
    }
}
