//! GUI module - User interface components

mod app;
mod chart_viewer;
mod experiment_page;

pub use app::DashboardApp;
pub use chart_viewer::ChartViewer;
pub use experiment_page::{ExperimentAction, ExperimentPage};
