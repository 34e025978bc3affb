//! Trace descriptors: one renderable series per KPI column.

use super::color::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opacity applied to every trace.
pub const TRACE_OPACITY: f32 = 0.95;
/// Bar outline / marker line width.
pub const TRACE_LINE_WIDTH: f32 = 0.1;

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlotKind {
    #[default]
    Bar,
    Scatter,
}

impl PlotKind {
    pub const ALL: [PlotKind; 2] = [PlotKind::Bar, PlotKind::Scatter];

    pub fn label(self) -> &'static str {
        match self {
            PlotKind::Bar => "Bar",
            PlotKind::Scatter => "Scatter",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlotKind {
    type Err = super::ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(PlotKind::Bar),
            "scatter" | "line" => Ok(PlotKind::Scatter),
            _ => Err(super::ChartError::UnknownPlotKind(s.to_string())),
        }
    }
}

/// One series of a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSpec {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub kind: PlotKind,
    /// Fixed color; `None` lets the renderer pick from the palette by position.
    pub color: Option<Rgb>,
    pub opacity: f32,
    pub line_width: f32,
    /// Hover text.
    pub text: String,
}

impl TraceSpec {
    /// Color to draw with, falling back to the palette slot of `index`.
    pub fn resolved_color(&self, index: usize) -> Rgb {
        self.color.unwrap_or_else(|| Rgb::default_for(index))
    }

    /// (x, y) pairs, skipping missing values.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .copied()
            .zip(self.y.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_kind_parses_at_the_boundary() {
        assert_eq!("Bar".parse::<PlotKind>().unwrap(), PlotKind::Bar);
        assert_eq!(" scatter ".parse::<PlotKind>().unwrap(), PlotKind::Scatter);
        assert!("pie".parse::<PlotKind>().is_err());
    }

    #[test]
    fn points_skip_missing_values() {
        let trace = TraceSpec {
            name: "KPI".into(),
            x: vec![0.0, 1.0, 2.0],
            y: vec![1.0, f64::NAN, 3.0],
            kind: PlotKind::Scatter,
            color: None,
            opacity: TRACE_OPACITY,
            line_width: TRACE_LINE_WIDTH,
            text: "KPI".into(),
        };
        assert_eq!(trace.points().collect::<Vec<_>>(), vec![(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(trace.resolved_color(1), Rgb::default_for(1));
    }
}
