//! Figure-wide presentation settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How bar traces sharing an x value are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Side by side.
    Group,
    /// On top of each other; positives and negatives stack separately.
    Stack,
    /// Drawn at the same position, later traces in front.
    Overlay,
}

impl BarMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BarMode::Group => "group",
            BarMode::Stack => "stack",
            BarMode::Overlay => "overlay",
        }
    }
}

impl fmt::Display for BarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarMode {
    type Err = super::ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "group" | "grouped" => Ok(BarMode::Group),
            "stack" | "stacked" => Ok(BarMode::Stack),
            "overlay" => Ok(BarMode::Overlay),
            _ => Err(super::ChartError::UnknownBarMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickPlacement {
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    pub tick0: f64,
    /// Distance between ticks; `None` lets the renderer choose.
    pub dtick: Option<f64>,
    pub zeroline: bool,
    pub ticks: TickPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSpec {
    pub orientation: Orientation,
    pub x: f64,
    pub y: f64,
    pub xanchor: Anchor,
    pub yanchor: Anchor,
    pub font_size: u32,
    /// Legend lists traces in the order they were added.
    pub normal_order: bool,
}

/// Free text placed in paper coordinates (0..1 over the plot area).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub show_legend: bool,
    pub legend: LegendSpec,
    /// `None` leaves the renderer default, which groups bars.
    pub bar_mode: Option<BarMode>,
    /// Fixed width and height in pixels.
    pub size: Option<(u32, u32)>,
    pub annotations: Vec<Annotation>,
}

impl LayoutSpec {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Effective bar mode.
    pub fn bar_mode_or_default(&self) -> BarMode {
        self.bar_mode.unwrap_or(BarMode::Group)
    }
}
