//! Charts module - trace/layout construction and rendering

mod builder;
mod color;
mod figure;
mod layout;
mod plotter;
mod renderer;
mod trace;

pub use builder::{ChartBuilder, ChartError, LEGEND_FONT_SIZE, X_TICK_INTERVAL};
pub use color::{ColorError, ColorMap, Rgb, PALETTE};
pub use figure::{BarRect, Bounds, ExportError, Figure};
pub use layout::{
    Anchor, Annotation, AxisSpec, BarMode, LayoutSpec, LegendSpec, Orientation, TickPlacement,
};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use trace::{PlotKind, TraceSpec, TRACE_LINE_WIDTH, TRACE_OPACITY};
