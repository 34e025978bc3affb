//! Chart Viewer Widget
//! Framed card showing one figure, or the reason it could not be built.

use crate::charts::{ChartError, ChartPlotter, Figure};
use egui::{Color32, RichText};

pub const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

pub struct ChartViewer;

impl ChartViewer {
    /// Draw a titled card for `figure`.
    pub fn show_card(
        ui: &mut egui::Ui,
        id: &str,
        title: &str,
        figure: &Result<Figure, ChartError>,
    ) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(6.0);

                match figure {
                    Ok(figure) => ChartPlotter::draw_figure(ui, id, figure),
                    Err(e) => {
                        ui.label(RichText::new(format!("Error: {}", e)).color(ERROR_COLOR));
                    }
                }
            });
    }
}
