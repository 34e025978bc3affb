//! NRAR Viz Main Application
//! Sidebar navigation with home, experiment and about pages.

use crate::charts::{Figure, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::TableCache;
use crate::gui::{ExperimentAction, ExperimentPage};
use egui::{Color32, RichText, SidePanel};
use tracing::warn;

/// PNG size used when the figure has no fixed size.
const DEFAULT_EXPORT_SIZE: (u32, u32) = (1400, 800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Experiment(usize),
    TradeOff,
    About,
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    page: Page,
    cache: TableCache,
    experiments: Vec<ExperimentPage>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let experiments = config
            .experiments
            .iter()
            .map(|exp| ExperimentPage::new(exp.clone(), config.experiment_dir(exp)))
            .collect();

        Self {
            config,
            page: Page::Home,
            cache: TableCache::new(),
            experiments,
        }
    }

    fn handle_reload(&mut self, index: usize) {
        self.experiments[index].reload(&mut self.cache);
    }

    fn handle_export_json(&mut self, index: usize, figure: Figure) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Plotly JSON", &["json"])
            .set_file_name("figure.json")
            .save_file()
        else {
            return; // User cancelled
        };

        let status = match figure.write_json(&path) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => {
                warn!(error = %e, "figure json export failed");
                format!("Error: {}", e)
            }
        };
        self.experiments[index].set_status(&status);
    }

    fn handle_export_png(&mut self, index: usize, figure: Figure) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("figure.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let (width, height) = figure.layout.size.unwrap_or(DEFAULT_EXPORT_SIZE);
        let status = match StaticChartRenderer::render_png(&figure, &path, width, height) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => {
                warn!(error = %e, "figure png export failed");
                format!("Error: {}", e)
            }
        };
        self.experiments[index].set_status(&status);
    }

    fn show_navigation(&mut self, ui: &mut egui::Ui) {
        ui.add_space(5.0);
        ui.label(
            RichText::new(&self.config.sidebar_title)
                .size(20.0)
                .color(Color32::from_rgb(100, 149, 237)),
        );
        ui.add_space(10.0);

        ui.label(RichText::new("Go to").strong());
        ui.radio_value(&mut self.page, Page::Home, "Home");
        for (i, exp) in self.config.experiments.iter().enumerate() {
            ui.radio_value(&mut self.page, Page::Experiment(i), &exp.name);
        }
        ui.radio_value(&mut self.page, Page::TradeOff, "Trade-Off Analysis");
        ui.radio_value(&mut self.page, Page::About, "About");

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("About").size(16.0).strong());
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.config.about).size(12.0));
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - navigation
        SidePanel::left("navigation")
            .min_width(220.0)
            .max_width(300.0)
            .show(ctx, |ui| self.show_navigation(ui));

        // Central panel - selected page
        let mut pending: Option<(usize, ExperimentAction)> = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(RichText::new(&self.config.title).size(26.0));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                Page::Home => {
                    ui.label(&self.config.home);
                }
                Page::Experiment(i) => {
                    if let Some(page) = self.experiments.get_mut(i) {
                        let action = page.show(
                            ui,
                            &mut self.cache,
                            &self.config.x_axis_title,
                            &self.config.colors,
                        );
                        pending = Some((i, action));
                    }
                }
                Page::TradeOff => {
                    ui.label(
                        RichText::new("No trade-off analysis has been configured yet.")
                            .color(Color32::GRAY),
                    );
                }
                Page::About => {
                    ui.label(&self.config.about);
                }
            });
        });

        match pending {
            Some((i, ExperimentAction::Reload)) => self.handle_reload(i),
            Some((i, ExperimentAction::ExportJson(figure))) => self.handle_export_json(i, figure),
            Some((i, ExperimentAction::ExportPng(figure))) => self.handle_export_png(i, figure),
            Some((_, ExperimentAction::None)) | None => {}
        }
    }
}
