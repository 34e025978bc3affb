//! Dashboard configuration: pages, data locations and chart views.

use crate::charts::{
    Annotation, BarMode, ChartBuilder, ChartError, ColorMap, Figure, PlotKind,
};
use crate::data::Table;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One chart: which columns to plot and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricView {
    pub label: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub plot_kind: PlotKind,
    #[serde(default)]
    pub bar_mode: Option<BarMode>,
    pub y_axis_title: String,
    /// Fixed figure size in pixels.
    #[serde(default)]
    pub size: Option<(u32, u32)>,
    /// Caption drawn above the legend.
    #[serde(default)]
    pub caption: Option<String>,
}

impl MetricView {
    pub fn new(label: &str, columns: &[&str], y_axis_title: &str) -> Self {
        Self {
            label: label.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            plot_kind: PlotKind::Bar,
            bar_mode: None,
            y_axis_title: y_axis_title.to_string(),
            size: None,
            caption: None,
        }
    }

    /// Build this view's figure for `table`, drawn as `plot_kind`.
    pub fn figure_as(
        &self,
        table: &Table,
        plot_kind: PlotKind,
        x_axis_title: &str,
        colors: &ColorMap,
    ) -> Result<Figure, ChartError> {
        let traces = ChartBuilder::collect_traces(table, self.columns.as_slice(), plot_kind, Some(colors))?;
        let mut layout = ChartBuilder::create_layout(x_axis_title, &self.y_axis_title, self.bar_mode);
        if let Some((width, height)) = self.size {
            layout = layout.with_size(width, height);
        }
        if let Some(caption) = &self.caption {
            layout = layout.with_annotation(Annotation {
                text: caption.clone(),
                x: 0.5,
                y: 1.12,
                font_size: 15,
            });
        }
        Ok(Figure::new(traces, layout))
    }

    pub fn figure(
        &self,
        table: &Table,
        x_axis_title: &str,
        colors: &ColorMap,
    ) -> Result<Figure, ChartError> {
        self.figure_as(table, self.plot_kind, x_axis_title, colors)
    }
}

/// One experiment page backed by a directory of simulation outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    /// Relative to the data root.
    pub directory: PathBuf,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub burn_in: Vec<MetricView>,
    pub metrics: Vec<MetricView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub sidebar_title: String,
    pub about: String,
    pub home: String,
    pub data_root: PathBuf,
    pub x_axis_title: String,
    pub colors: ColorMap,
    pub experiments: Vec<ExperimentConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut activity = MetricView::new(
            "NRAR's activity",
            &["KPI-total-investigations", "KPI-total-audits"],
            "Actions",
        );
        activity.bar_mode = Some(BarMode::Stack);

        let mut compliance =
            MetricView::new("Farmers Real Compliance", &["KPI-farmers-compliance"], "Farmers");
        compliance.size = Some((1000, 600));
        compliance.caption = Some("Legend".to_string());

        let burn_in = vec![
            MetricView::new("Overall Compliance level", &["KPI-farmers-compliance"], "Farmers"),
            MetricView::new("NRAR's activity", &["KPI-total-investigations"], "Investigations"),
        ];

        Self {
            title: "NRAR Data Visualisation".to_string(),
            sidebar_title: "NRAR Web Apps".to_string(),
            about: "NRAR's interdisciplinary behavioural and cost optimisation model: \
                    a collection of dashboards for data analysis, data visualisation \
                    and exploratory modelling."
                .to_string(),
            home: "Use the sidebar to pick an experiment. Each experiment page loads the \
                   simulation outputs of its folder and charts the selected KPIs over \
                   simulation time."
                .to_string(),
            data_root: PathBuf::from("..").join("data"),
            x_axis_title: "Simulation Time (weeks)".to_string(),
            colors: ColorMap::new(),
            experiments: vec![ExperimentConfig {
                name: "Experiment - Penalties".to_string(),
                directory: PathBuf::from("Exp - Penalties"),
                description: "This experiment tests the effect of penalties by increasing \
                              fines' amount and frequency. The base situation is a basin of \
                              500 farmers with an average compliance level between 30% and \
                              50%, and about 4% routine inspections.\n\n\
                              Scenario parameters:\n\
                              1. Fine Amount: between 1.000 AUD and 100.000 AUD\n\
                              2. Audit Frequency: overall audit activity x2 and x3\n\
                              3. Water Restriction: good, moderate and bad hydrological conditions"
                    .to_string(),
                burn_in,
                metrics: vec![compliance, activity],
            }],
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config; missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            file = %path.display(),
            experiments = config.experiments.len(),
            "loaded dashboard config"
        );
        Ok(config)
    }

    /// Directory holding the outputs of `experiment`.
    pub fn experiment_dir(&self, experiment: &ExperimentConfig) -> PathBuf {
        self.data_root.join(&experiment.directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Rgb;
    use crate::data::kpi_table;
    use tempfile::TempDir;

    #[test]
    fn defaults_describe_penalties_experiment() {
        let config = DashboardConfig::default();
        assert_eq!(config.experiments.len(), 1);
        let exp = &config.experiments[0];
        assert_eq!(
            config.experiment_dir(exp),
            Path::new("..").join("data").join("Exp - Penalties")
        );
        assert_eq!(exp.metrics[0].columns, vec!["KPI-farmers-compliance"]);
        assert_eq!(exp.metrics[1].bar_mode, Some(BarMode::Stack));
        assert_eq!(exp.burn_in.len(), 2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(
            &path,
            r##"{
                "data_root": "/srv/nrar",
                "colors": { "KPI-a": "purple", "KPI-b": "#00ff00" },
                "experiments": [{
                    "name": "Trial",
                    "directory": "trial",
                    "metrics": [{
                        "label": "Both",
                        "columns": ["KPI-a", "KPI-b"],
                        "plot_kind": "Scatter",
                        "bar_mode": "overlay",
                        "y_axis_title": "Count"
                    }]
                }]
            }"##,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.title, "NRAR Data Visualisation");
        assert_eq!(config.data_root, PathBuf::from("/srv/nrar"));
        assert_eq!(config.colors["KPI-a"], Rgb::new(128, 0, 128));
        let metric = &config.experiments[0].metrics[0];
        assert_eq!(metric.plot_kind, PlotKind::Scatter);
        assert_eq!(metric.bar_mode, Some(BarMode::Overlay));
        assert!(config.experiments[0].burn_in.is_empty());
    }

    #[test]
    fn bad_color_is_a_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{ "colors": { "KPI-a": "not-a-color" } }"#).unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Json { .. })
        ));
        assert!(matches!(
            DashboardConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn metric_view_builds_figure() {
        let mut colors = ColorMap::new();
        colors.insert("KPI-a".to_string(), Rgb::new(1, 2, 3));

        let mut view = MetricView::new("Both", &["KPI-a", "KPI-b"], "Farmers");
        view.bar_mode = Some(BarMode::Stack);
        view.size = Some((1000, 600));
        view.caption = Some("Legend".to_string());

        let fig = view.figure(&kpi_table(), "Time", &colors).unwrap();
        assert_eq!(fig.traces.len(), 2);
        assert_eq!(fig.traces[0].color, Some(Rgb::new(1, 2, 3)));
        assert_eq!(fig.layout.y_axis.title, "Farmers");
        assert_eq!(fig.layout.size, Some((1000, 600)));
        assert_eq!(fig.layout.annotations[0].text, "Legend");

        let scatter = view
            .figure_as(&kpi_table(), PlotKind::Scatter, "Time", &colors)
            .unwrap();
        assert!(scatter.traces.iter().all(|t| t.kind == PlotKind::Scatter));

        let missing = MetricView::new("Gone", &["KPI-gone"], "y");
        assert!(missing.figure(&kpi_table(), "Time", &colors).is_err());
    }
}
