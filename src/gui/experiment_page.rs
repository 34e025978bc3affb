//! Experiment Page Widget
//! Loads one experiment folder and charts the chosen KPIs.

use crate::charts::{ColorMap, Figure, PlotKind};
use crate::config::ExperimentConfig;
use crate::data::{Table, TableCache};
use crate::gui::chart_viewer::{ChartViewer, ERROR_COLOR};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;
use std::sync::Arc;

/// Actions triggered from an experiment page
#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentAction {
    None,
    Reload,
    ExportJson(Figure),
    ExportPng(Figure),
}

/// Page state for one configured experiment.
pub struct ExperimentPage {
    pub experiment: ExperimentConfig,
    pub directory: PathBuf,
    pub selected_table: usize,
    pub selected_metric: usize,
    pub plot_kind: PlotKind,
    pub show_burn_in: bool,
    pub status: String,
    /// Last load failure; kept until the user reloads.
    load_error: Option<String>,
}

impl ExperimentPage {
    pub fn new(experiment: ExperimentConfig, directory: PathBuf) -> Self {
        let plot_kind = experiment
            .metrics
            .first()
            .map(|m| m.plot_kind)
            .unwrap_or_default();
        Self {
            experiment,
            directory,
            selected_table: 0,
            selected_metric: 0,
            plot_kind,
            show_burn_in: false,
            status: String::new(),
            load_error: None,
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Tables of this experiment. A failed load is remembered and not
    /// retried until [`reload`](Self::reload).
    pub fn tables(&mut self, cache: &mut TableCache) -> Result<Arc<[Table]>, String> {
        if let Some(error) = &self.load_error {
            return Err(error.clone());
        }
        cache.get_or_load(&self.directory).map_err(|e| {
            let message = e.to_string();
            self.load_error = Some(message.clone());
            message
        })
    }

    /// Drop the cached tables and any remembered failure.
    pub fn reload(&mut self, cache: &mut TableCache) {
        cache.invalidate(&self.directory);
        self.load_error = None;
        self.status.clear();
    }

    /// Draw the page
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        cache: &mut TableCache,
        x_axis_title: &str,
        colors: &ColorMap,
    ) -> ExperimentAction {
        let mut action = ExperimentAction::None;

        ui.heading(&self.experiment.name);
        if !self.experiment.description.is_empty() {
            ui.label(&self.experiment.description);
        }
        ui.add_space(10.0);

        let tables = match self.tables(cache) {
            Ok(tables) => tables,
            Err(e) => {
                ui.label(RichText::new(format!("Error: {}", e)).color(ERROR_COLOR));
                if ui.button("⟳ Retry").clicked() {
                    action = ExperimentAction::Reload;
                }
                return action;
            }
        };

        ui.horizontal(|ui| {
            ui.label(format!("{} files loaded", tables.len()));
            if ui.small_button("⟳ Reload").clicked() {
                action = ExperimentAction::Reload;
            }
        });

        if tables.is_empty() {
            ui.label(
                RichText::new(format!("No simulation outputs in {}", self.directory.display()))
                    .color(Color32::GRAY),
            );
            return action;
        }

        if self.selected_table >= tables.len() {
            self.selected_table = 0;
        }

        ui.horizontal(|ui| {
            ui.label("Scenario:");
            ComboBox::from_id_salt("scenario_table")
                .selected_text(tables[self.selected_table].name())
                .show_ui(ui, |ui| {
                    for (i, table) in tables.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_table, i, table.name());
                    }
                });
        });
        let table = &tables[self.selected_table];

        ui.collapsing(format!("Available KPIs ({} rows)", table.row_count()), |ui| {
            ui.label(
                RichText::new(table.numeric_columns().join(", "))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(8.0);

        // ===== Burn-in =====
        if !self.experiment.burn_in.is_empty() {
            ui.checkbox(&mut self.show_burn_in, "Show Scenario Setup (Burn-in)");
            if self.show_burn_in {
                let views = &self.experiment.burn_in;
                ui.columns(views.len(), |columns| {
                    for (i, (column, view)) in columns.iter_mut().zip(views).enumerate() {
                        let figure = view.figure(table, x_axis_title, colors);
                        ChartViewer::show_card(column, &format!("burn_in_{}", i), &view.label, &figure);
                    }
                });
                ui.add_space(10.0);
            }
        }

        if self.experiment.metrics.is_empty() {
            return action;
        }
        if self.selected_metric >= self.experiment.metrics.len() {
            self.selected_metric = 0;
        }

        // ===== Metric selection =====
        let previous_metric = self.selected_metric;
        ui.horizontal(|ui| {
            ui.label("Select metric to analyze:");
            ComboBox::from_id_salt("metric")
                .selected_text(&self.experiment.metrics[self.selected_metric].label)
                .show_ui(ui, |ui| {
                    for (i, metric) in self.experiment.metrics.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_metric, i, &metric.label);
                    }
                });
        });
        if self.selected_metric != previous_metric {
            self.plot_kind = self.experiment.metrics[self.selected_metric].plot_kind;
        }

        ui.horizontal(|ui| {
            for kind in PlotKind::ALL {
                ui.radio_value(&mut self.plot_kind, kind, kind.label());
            }
        });
        ui.add_space(8.0);

        let metric = &self.experiment.metrics[self.selected_metric];
        let figure = metric.figure_as(table, self.plot_kind, x_axis_title, colors);
        ChartViewer::show_card(ui, "metric_chart", &metric.label, &figure);

        if let Ok(figure) = &figure {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("📄 Export JSON").clicked() {
                    action = ExperimentAction::ExportJson(figure.clone());
                }
                if ui.button("🖼 Export PNG").clicked() {
                    action = ExperimentAction::ExportPng(figure.clone());
                }
            });
        }

        if !self.status.is_empty() {
            let color = if self.status.starts_with("Error") {
                ERROR_COLOR
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(color));
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use std::fs;
    use tempfile::TempDir;

    fn page(directory: PathBuf) -> ExperimentPage {
        let experiment = DashboardConfig::default().experiments[0].clone();
        ExperimentPage::new(experiment, directory)
    }

    #[test]
    fn failed_load_is_kept_until_reload() {
        let root = TempDir::new().unwrap();
        let directory = root.path().join("Exp - Penalties");
        let mut cache = TableCache::new();
        let mut page = page(directory.clone());

        let first = page.tables(&mut cache).unwrap_err();
        assert!(first.contains("Exp - Penalties"));

        // Fixing the folder is not picked up on the next frame.
        fs::create_dir(&directory).unwrap();
        fs::write(directory.join("run.csv"), "step,KPI-a\n0,1\n").unwrap();
        assert_eq!(page.tables(&mut cache).unwrap_err(), first);
        assert!(cache.is_empty());

        page.reload(&mut cache);
        assert_eq!(page.tables(&mut cache).unwrap().len(), 1);
        assert!(cache.contains(&directory));
    }

    #[test]
    fn reload_rereads_a_loaded_directory() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("a.csv"), "step,KPI-a\n0,1\n").unwrap();
        let mut cache = TableCache::new();
        let mut page = page(root.path().to_path_buf());
        page.set_status("Exported figure.json");

        assert_eq!(page.tables(&mut cache).unwrap().len(), 1);
        fs::write(root.path().join("b.csv"), "step,KPI-a\n0,2\n").unwrap();
        assert_eq!(page.tables(&mut cache).unwrap().len(), 1);

        page.reload(&mut cache);
        assert!(page.status.is_empty());
        assert_eq!(page.tables(&mut cache).unwrap().len(), 2);
    }
}
