//! egui rendering.  Reads [`crate::state::AppState`]; all numbers come from
//! the data pipeline.

pub mod panels;
pub mod plot;
pub mod table;
