//! Chart Builder Module
//! Turns table columns into trace descriptors and builds figure layouts.

use super::color::ColorMap;
use super::layout::{
    Anchor, AxisSpec, BarMode, LayoutSpec, LegendSpec, Orientation, TickPlacement,
};
use super::trace::{PlotKind, TraceSpec, TRACE_LINE_WIDTH, TRACE_OPACITY};
use crate::data::{Table, TableError};
use thiserror::Error;

/// Spacing of x-axis ticks, in time steps.
pub const X_TICK_INTERVAL: f64 = 10.0;
pub const LEGEND_FONT_SIZE: u32 = 12;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },
    #[error("No columns selected")]
    NoColumns,
    #[error("Unknown plot kind: {0}")]
    UnknownPlotKind(String),
    #[error("Unknown bar mode: {0}")]
    UnknownBarMode(String),
    #[error("Table error: {0}")]
    TableError(TableError),
}

impl From<TableError> for ChartError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::ColumnNotFound { table, column } => {
                ChartError::ColumnNotFound { table, column }
            }
            other => ChartError::TableError(other),
        }
    }
}

/// Builds figure parts from loaded tables. Holds no state.
pub struct ChartBuilder;

impl ChartBuilder {
    /// One trace per requested column, in the order given.
    ///
    /// Every column is checked before any trace is built, so a missing column
    /// yields an error and never a partial list.
    pub fn collect_traces<S: AsRef<str>>(
        table: &Table,
        column_names: &[S],
        plot_kind: PlotKind,
        color_map: Option<&ColorMap>,
    ) -> Result<Vec<TraceSpec>, ChartError> {
        if column_names.is_empty() {
            return Err(ChartError::NoColumns);
        }
        if let Some(missing) = column_names
            .iter()
            .map(|name| -> &str { name.as_ref() })
            .find(|name| !table.has_column(name))
        {
            return Err(table.column_not_found(missing).into());
        }

        let x = table.index_values()?;
        column_names
            .iter()
            .map(|name| -> Result<TraceSpec, ChartError> {
                let name: &str = name.as_ref();
                Ok(TraceSpec {
                    name: name.to_string(),
                    x: x.clone(),
                    y: table.column_values(name)?,
                    kind: plot_kind,
                    color: color_map.and_then(|colors| colors.get(name).copied()),
                    opacity: TRACE_OPACITY,
                    line_width: TRACE_LINE_WIDTH,
                    text: name.to_string(),
                })
            })
            .collect()
    }

    /// Layout with the dashboard's fixed axis and legend styling.
    pub fn create_layout(
        x_axis_title: &str,
        y_axis_title: &str,
        bar_mode: Option<BarMode>,
    ) -> LayoutSpec {
        LayoutSpec {
            x_axis: AxisSpec {
                title: x_axis_title.to_string(),
                tick0: 0.0,
                dtick: Some(X_TICK_INTERVAL),
                zeroline: true,
                ticks: TickPlacement::Inside,
            },
            y_axis: AxisSpec {
                title: y_axis_title.to_string(),
                tick0: 0.0,
                dtick: None,
                zeroline: false,
                ticks: TickPlacement::Inside,
            },
            show_legend: true,
            // Centered, just above the plot area.
            legend: LegendSpec {
                orientation: Orientation::Horizontal,
                x: 0.5,
                y: 1.002,
                xanchor: Anchor::Center,
                yanchor: Anchor::Bottom,
                font_size: LEGEND_FONT_SIZE,
                normal_order: true,
            },
            bar_mode,
            size: None,
            annotations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Rgb;
    use crate::data::kpi_table;

    #[test]
    fn one_trace_per_column_in_order() {
        let table = kpi_table();
        let traces =
            ChartBuilder::collect_traces(&table, &["KPI-b", "KPI-a"], PlotKind::Bar, None).unwrap();

        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].name, "KPI-b");
        assert_eq!(traces[1].name, "KPI-a");
        assert_eq!(traces[1].x, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(traces[1].y, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(traces.iter().all(|t| t.kind == PlotKind::Bar));
        assert!(traces.iter().all(|t| t.opacity == 0.95 && t.line_width == 0.1));
        assert_eq!(traces[0].text, "KPI-b");
    }

    #[test]
    fn color_map_overrides_only_listed_columns() {
        let table = kpi_table();
        let mut colors = ColorMap::new();
        colors.insert("KPI-a".into(), Rgb::new(128, 0, 128));
        colors.insert("KPI-unused".into(), Rgb::new(1, 2, 3));

        let traces = ChartBuilder::collect_traces(
            &table,
            &["KPI-a", "KPI-b"],
            PlotKind::Scatter,
            Some(&colors),
        )
        .unwrap();
        assert_eq!(traces[0].color, Some(Rgb::new(128, 0, 128)));
        assert_eq!(traces[1].color, None);
    }

    #[test]
    fn missing_column_fails_whole_call() {
        let table = kpi_table();
        let err = ChartBuilder::collect_traces(&table, &["KPI-a", "KPI-x"], PlotKind::Bar, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::ColumnNotFound { ref column, .. } if column == "KPI-x"
        ));
    }

    #[test]
    fn index_column_is_not_a_kpi() {
        let table = kpi_table();
        assert!(ChartBuilder::collect_traces(&table, &["step"], PlotKind::Bar, None).is_err());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let table = kpi_table();
        let none: [&str; 0] = [];
        assert!(matches!(
            ChartBuilder::collect_traces(&table, &none, PlotKind::Bar, None),
            Err(ChartError::NoColumns)
        ));
    }

    #[test]
    fn stacked_layout_keeps_titles() {
        let layout = ChartBuilder::create_layout("Time", "Farmers", Some(BarMode::Stack));
        assert_eq!(layout.x_axis.title, "Time");
        assert_eq!(layout.y_axis.title, "Farmers");
        assert_eq!(layout.bar_mode, Some(BarMode::Stack));
    }

    #[test]
    fn layout_defaults() {
        let layout = ChartBuilder::create_layout("x", "y", None);
        assert_eq!(layout.x_axis.dtick, Some(10.0));
        assert!(layout.x_axis.zeroline);
        assert!(!layout.y_axis.zeroline);
        assert_eq!(layout.x_axis.ticks, TickPlacement::Inside);
        assert_eq!(layout.y_axis.ticks, TickPlacement::Inside);
        assert!(layout.show_legend);
        assert_eq!(layout.legend.orientation, Orientation::Horizontal);
        assert_eq!(layout.legend.xanchor, Anchor::Center);
        assert_eq!(layout.legend.yanchor, Anchor::Bottom);
        assert_eq!((layout.legend.x, layout.legend.y), (0.5, 1.002));
        assert_eq!(layout.legend.font_size, 12);
        assert_eq!(layout.bar_mode, None);
        assert_eq!(layout.bar_mode_or_default(), BarMode::Group);
    }

    #[test]
    fn bar_mode_parses_at_the_boundary() {
        assert_eq!("stack".parse::<BarMode>().unwrap(), BarMode::Stack);
        assert!(matches!(
            "sideways".parse::<BarMode>(),
            Err(ChartError::UnknownBarMode(_))
        ));
    }
}
