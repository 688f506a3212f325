use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::format::Column;
use crate::data::model::ProductTable;

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 420.0;

// ---------------------------------------------------------------------------
// Product table (filtered rows, formatted cells)
// ---------------------------------------------------------------------------

pub fn product_table(ui: &mut Ui, rows: &ProductTable) {
    ui.label(format!("{} products", rows.len()));

    // Own id scope: the page around us scrolls too.
    ui.push_id("product_table", |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .max_scroll_height(MAX_TABLE_HEIGHT);
        for column in Column::ALL {
            builder = builder.column(match column {
                Column::Name => TableColumn::remainder().at_least(200.0).clip(true),
                _ => TableColumn::auto().at_least(80.0),
            });
        }

        builder
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for column in Column::ALL {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.header());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let Some(product) = rows.get(row.index()) else {
                        return;
                    };
                    for column in Column::ALL {
                        row.col(|ui: &mut Ui| {
                            let text = column.cell(product);
                            if column.is_numeric() {
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    ui.label(text);
                                });
                            } else {
                                ui.add(egui::Label::new(text).truncate());
                            }
                        });
                    }
                });
            });
    });
}
