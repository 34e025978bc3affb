//! Figure: traces plus layout, and the geometry/exports shared by renderers.

use super::layout::{AxisSpec, BarMode, LayoutSpec, Orientation};
use super::trace::{PlotKind, TraceSpec};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Share of the x step covered by the bars at one x value.
const BAR_GROUP_FRACTION: f64 = 0.8;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Drawing error: {0}")]
    Draw(String),
    #[error("Nothing to draw")]
    Empty,
}

/// Axis-aligned bar rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    fn include(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }
}

/// A complete chart, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub traces: Vec<TraceSpec>,
    pub layout: LayoutSpec,
}

impl Figure {
    pub fn new(traces: Vec<TraceSpec>, layout: LayoutSpec) -> Self {
        Self { traces, layout }
    }

    fn bar_indices(&self) -> Vec<usize> {
        self.traces
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == PlotKind::Bar)
            .map(|(i, _)| i)
            .collect()
    }

    /// Smallest distance between neighbouring x values of the bar traces.
    pub fn x_step(&self) -> f64 {
        let mut xs: Vec<f64> = self
            .bar_indices()
            .into_iter()
            .flat_map(|i| self.traces[i].x.iter().copied())
            .filter(|x| x.is_finite())
            .collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();

        xs.windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .fold(None, |min: Option<f64>, d| Some(min.map_or(d, |m| m.min(d))))
            .unwrap_or(1.0)
    }

    /// Center offset and width of the bars of trace `index`, or `None` for non-bar traces.
    pub fn bar_slot(&self, index: usize) -> Option<(f64, f64)> {
        let bars = self.bar_indices();
        let slot = bars.iter().position(|&i| i == index)?;
        let group_width = self.x_step() * BAR_GROUP_FRACTION;

        match self.layout.bar_mode_or_default() {
            BarMode::Group => {
                let width = group_width / bars.len() as f64;
                Some((-group_width / 2.0 + (slot as f64 + 0.5) * width, width))
            }
            BarMode::Stack | BarMode::Overlay => Some((0.0, group_width)),
        }
    }

    /// Bar rectangles per trace (empty for scatter traces), honoring the bar mode.
    pub fn bar_rects(&self) -> Vec<Vec<BarRect>> {
        let stacked = self.layout.bar_mode_or_default() == BarMode::Stack;
        // Running totals per x, kept apart for positive and negative values.
        let mut positive: HashMap<u64, f64> = HashMap::new();
        let mut negative: HashMap<u64, f64> = HashMap::new();

        self.traces
            .iter()
            .enumerate()
            .map(|(i, trace)| {
                let Some((offset, width)) = self.bar_slot(i) else {
                    return Vec::new();
                };
                trace
                    .points()
                    .map(|(x, y)| {
                        let center = x + offset;
                        let base = if !stacked {
                            0.0
                        } else {
                            let totals = if y >= 0.0 { &mut positive } else { &mut negative };
                            let total = totals.entry(x.to_bits()).or_insert(0.0);
                            let base = *total;
                            *total += y;
                            base
                        };
                        BarRect {
                            x0: center - width / 2.0,
                            x1: center + width / 2.0,
                            y0: base,
                            y1: base + y,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Data extent of every trace, `None` when there is nothing to draw.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut include = |x: f64, y: f64| {
            bounds
                .get_or_insert(Bounds {
                    x_min: x,
                    x_max: x,
                    y_min: y,
                    y_max: y,
                })
                .include(x, y)
        };

        for (trace, rects) in self.traces.iter().zip(self.bar_rects()) {
            if trace.kind == PlotKind::Bar {
                for r in rects {
                    include(r.x0, r.y0);
                    include(r.x1, r.y1);
                }
            } else {
                for (x, y) in trace.points() {
                    include(x, y);
                }
            }
        }
        bounds
    }

    /// Plotly figure JSON (`data` + `layout`).
    pub fn to_plotly_json(&self) -> Value {
        let data: Vec<Value> = self
            .traces
            .iter()
            .map(|t| {
                let color = t.color.map(|c| c.to_hex());
                // Plotly reads null as a gap.
                let y: Vec<Option<f64>> = t.y.iter().map(|y| y.is_finite().then_some(*y)).collect();
                let mut trace = json!({
                    "x": t.x,
                    "y": y,
                    "name": t.name,
                    "text": t.text,
                    "opacity": t.opacity,
                });
                match t.kind {
                    PlotKind::Bar => {
                        trace["type"] = json!("bar");
                        trace["marker"] = json!({ "line": { "width": t.line_width } });
                        if let Some(color) = color {
                            trace["marker"]["color"] = json!(color);
                        }
                    }
                    PlotKind::Scatter => {
                        trace["type"] = json!("scatter");
                        trace["mode"] = json!("lines+markers");
                        trace["marker"] = json!({ "line": { "width": t.line_width } });
                        if let Some(color) = color {
                            trace["marker"]["color"] = json!(color);
                            trace["line"] = json!({ "color": color });
                        }
                    }
                }
                trace
            })
            .collect();

        let l = &self.layout;
        let axis = |a: &AxisSpec| {
            let mut axis = json!({
                "title": { "text": a.title },
                "tick0": a.tick0,
                "zeroline": a.zeroline,
                "ticks": a.ticks,
            });
            if let Some(dtick) = a.dtick {
                axis["dtick"] = json!(dtick);
            }
            axis
        };

        let trace_order = if l.legend.normal_order { "normal" } else { "reversed" };
        let orientation = match l.legend.orientation {
            Orientation::Horizontal => "h",
            Orientation::Vertical => "v",
        };
        let mut layout = json!({
            "xaxis": axis(&l.x_axis),
            "yaxis": axis(&l.y_axis),
            "showlegend": l.show_legend,
            "legend": {
                "traceorder": trace_order,
                "orientation": orientation,
                "xanchor": l.legend.xanchor,
                "yanchor": l.legend.yanchor,
                "x": l.legend.x,
                "y": l.legend.y,
                "font": { "size": l.legend.font_size },
            },
        });
        if let Some(mode) = l.bar_mode {
            layout["barmode"] = json!(mode);
        }
        if let Some((width, height)) = l.size {
            layout["width"] = json!(width);
            layout["height"] = json!(height);
        }
        if !l.annotations.is_empty() {
            layout["annotations"] = l
                .annotations
                .iter()
                .map(|a| {
                    json!({
                        "text": a.text,
                        "x": a.x,
                        "y": a.y,
                        "xref": "paper",
                        "yref": "paper",
                        "showarrow": false,
                        "font": { "size": a.font_size },
                    })
                })
                .collect();
        }

        json!({ "data": data, "layout": layout })
    }

    /// Write the plotly JSON of this figure to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(&self.to_plotly_json())?;
        fs::write(path, text)?;
        info!(file = %path.display(), traces = self.traces.len(), "exported figure json");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartBuilder, Rgb, TRACE_LINE_WIDTH, TRACE_OPACITY};

    fn trace(name: &str, kind: PlotKind, y: Vec<f64>) -> TraceSpec {
        TraceSpec {
            name: name.to_string(),
            x: (0..y.len()).map(|i| i as f64).collect(),
            y,
            kind,
            color: None,
            opacity: TRACE_OPACITY,
            line_width: TRACE_LINE_WIDTH,
            text: name.to_string(),
        }
    }

    fn figure(mode: Option<BarMode>, traces: Vec<TraceSpec>) -> Figure {
        Figure::new(traces, ChartBuilder::create_layout("t", "v", mode))
    }

    #[test]
    fn grouped_bars_sit_side_by_side() {
        let fig = figure(
            None,
            vec![
                trace("a", PlotKind::Bar, vec![1.0, 2.0]),
                trace("b", PlotKind::Bar, vec![3.0, 4.0]),
            ],
        );
        let (off_a, width_a) = fig.bar_slot(0).unwrap();
        let (off_b, width_b) = fig.bar_slot(1).unwrap();
        assert!((width_a - 0.4).abs() < 1e-12);
        assert_eq!(width_a, width_b);
        assert!((off_a + 0.2).abs() < 1e-12);
        assert!((off_b - 0.2).abs() < 1e-12);

        let rects = fig.bar_rects();
        assert_eq!(rects[1][1].y0, 0.0);
        assert_eq!(rects[1][1].y1, 4.0);
    }

    #[test]
    fn stacked_bars_accumulate_per_sign() {
        let fig = figure(
            Some(BarMode::Stack),
            vec![
                trace("a", PlotKind::Bar, vec![1.0, -1.0]),
                trace("b", PlotKind::Bar, vec![2.0, -3.0]),
            ],
        );
        let rects = fig.bar_rects();
        assert_eq!((rects[1][0].y0, rects[1][0].y1), (1.0, 3.0));
        assert_eq!((rects[1][1].y0, rects[1][1].y1), (-1.0, -4.0));

        let bounds = fig.bounds().unwrap();
        assert_eq!(bounds.y_max, 3.0);
        assert_eq!(bounds.y_min, -4.0);
    }

    #[test]
    fn scatter_traces_have_no_bars() {
        let fig = figure(
            None,
            vec![
                trace("line", PlotKind::Scatter, vec![5.0, 6.0]),
                trace("bar", PlotKind::Bar, vec![1.0, 2.0]),
            ],
        );
        assert_eq!(fig.bar_slot(0), None);
        // The only bar trace fills the whole group.
        assert_eq!(fig.bar_slot(1).map(|(o, _)| o), Some(0.0));
        assert!(fig.bar_rects()[0].is_empty());
        assert_eq!(fig.bounds().unwrap().y_max, 6.0);
    }

    #[test]
    fn empty_figure_has_no_bounds() {
        assert_eq!(figure(None, vec![]).bounds(), None);
    }

    #[test]
    fn plotly_json_matches_figure() {
        let mut a = trace("KPI-total-audits", PlotKind::Bar, vec![1.0, f64::NAN]);
        a.color = Some(Rgb::new(128, 0, 128));
        let fig = figure(Some(BarMode::Stack), vec![a]);
        let json = fig.to_plotly_json();

        let t = &json["data"][0];
        assert_eq!(t["type"], "bar");
        assert_eq!(t["name"], "KPI-total-audits");
        assert_eq!(t["marker"]["color"], "#800080");
        assert!(t["y"][1].is_null());

        let layout = &json["layout"];
        assert_eq!(layout["barmode"], "stack");
        assert_eq!(layout["xaxis"]["dtick"], 10.0);
        assert_eq!(layout["xaxis"]["ticks"], "inside");
        assert_eq!(layout["yaxis"]["zeroline"], false);
        assert_eq!(layout["legend"]["orientation"], "h");
        assert_eq!(layout["legend"]["xanchor"], "center");
        assert_eq!(layout["legend"]["font"]["size"], 12);
        assert!(layout.get("width").is_none());
    }

    #[test]
    fn write_json_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("figure.json");
        let fig = figure(None, vec![trace("a", PlotKind::Scatter, vec![1.0])]);
        fig.write_json(&path).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["data"][0]["mode"], "lines+markers");
    }
}
