//! Static Chart Renderer
//! Writes a figure to a PNG file with plotters.
//!
//! Layout:
//! 1. Optional annotation line as caption
//! 2. Plot area with axis titles, x ticks every `dtick`
//! 3. Legend box centered above the series

use super::figure::{ExportError, Figure};
use super::trace::PlotKind;
use plotters::prelude::{
    BindKeyPoints, BitMapBackend, ChartBuilder as PlotArea, Color, FontFamily, IntoDrawingArea,
    LineSeries, PathElement, Rectangle, RGBColor, SeriesLabelPosition, BLACK, WHITE,
};
use std::ops::Range;
use std::path::Path;
use tracing::info;

const ZERO_LINE: RGBColor = RGBColor(160, 160, 160);
/// Tick count used when the axis has no fixed interval.
const AUTO_TICKS: f64 = 10.0;
const MAX_TICKS: usize = 200;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `figure` as a `width` x `height` PNG at `path`.
    pub fn render_png(
        figure: &Figure,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        let bounds = figure.bounds().ok_or(ExportError::Empty)?;
        let layout = &figure.layout;
        let draw_err = |e: &dyn std::fmt::Display| ExportError::Draw(e.to_string());

        // Pad so bars and markers do not touch the frame.
        let x_pad = ((bounds.x_max - bounds.x_min) * 0.02).max(0.5);
        let y_span = (bounds.y_max - bounds.y_min).abs().max(1.0);
        let x_range = (bounds.x_min - x_pad)..(bounds.x_max + x_pad);
        let y_range = (bounds.y_min.min(0.0) - y_span * 0.05)..(bounds.y_max + y_span * 0.15);

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_err(&e))?;

        let mut builder = PlotArea::on(&root);
        builder
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70);
        if let Some(annotation) = layout.annotations.first() {
            builder.caption(
                &annotation.text,
                (FontFamily::SansSerif, f64::from(annotation.font_size)),
            );
        }
        let x_ticks = x_key_points(layout.x_axis.tick0, layout.x_axis.dtick, &x_range);
        let x_labels = x_ticks.len();
        let mut chart = builder
            .build_cartesian_2d(x_range.clone().with_key_points(x_ticks), y_range.clone())
            .map_err(|e| draw_err(&e))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(layout.x_axis.title.as_str())
            .y_desc(layout.y_axis.title.as_str())
            .x_labels(x_labels)
            .x_label_formatter(&|x| format!("{}", x))
            .draw()
            .map_err(|e| draw_err(&e))?;

        if layout.x_axis.zeroline && x_range.contains(&0.0) {
            chart
                .draw_series(LineSeries::new(
                    [(0.0, y_range.start), (0.0, y_range.end)],
                    ZERO_LINE,
                ))
                .map_err(|e| draw_err(&e))?;
        }
        if layout.y_axis.zeroline && y_range.contains(&0.0) {
            chart
                .draw_series(LineSeries::new(
                    [(x_range.start, 0.0), (x_range.end, 0.0)],
                    ZERO_LINE,
                ))
                .map_err(|e| draw_err(&e))?;
        }

        let bar_rects = figure.bar_rects();
        for (i, trace) in figure.traces.iter().enumerate() {
            let rgb = trace.resolved_color(i);
            let color = RGBColor(rgb.r, rgb.g, rgb.b);
            let style = color.mix(f64::from(trace.opacity));

            match trace.kind {
                PlotKind::Bar => {
                    let rects = bar_rects[i].iter().map(|r| {
                        Rectangle::new([(r.x0, r.y0), (r.x1, r.y1)], style.filled())
                    });
                    chart
                        .draw_series(rects)
                        .map_err(|e| draw_err(&e))?
                        .label(trace.name.as_str())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                        });
                }
                PlotKind::Scatter => {
                    chart
                        .draw_series(LineSeries::new(trace.points(), style.stroke_width(2)))
                        .map_err(|e| draw_err(&e))?
                        .label(trace.name.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                }
            }
        }

        if layout.show_legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperMiddle)
                .label_font((FontFamily::SansSerif, f64::from(layout.legend.font_size)))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| draw_err(&e))?;
        }

        root.present().map_err(|e| draw_err(&e))?;
        info!(file = %path.display(), width, height, "rendered figure png");
        Ok(())
    }
}

/// Tick positions `tick0 + k * dtick` inside `range`. Without an interval,
/// or when it would produce too many ticks, the step is widened.
fn x_key_points(tick0: f64, dtick: Option<f64>, range: &Range<f64>) -> Vec<f64> {
    let span = range.end - range.start;
    if !(span.is_finite() && span > 0.0) {
        return vec![range.start];
    }

    let mut step = match dtick {
        Some(d) if d > 0.0 => d,
        _ => span / AUTO_TICKS,
    };
    while span / step > MAX_TICKS as f64 {
        step *= 2.0;
    }

    let first = tick0 + ((range.start - tick0) / step).ceil() * step;
    (0..=MAX_TICKS)
        .map(|k| first + k as f64 * step)
        .take_while(|x| *x <= range.end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BarMode, ChartBuilder, TraceSpec, TRACE_LINE_WIDTH, TRACE_OPACITY};
    use tempfile::TempDir;

    fn trace(name: &str, kind: PlotKind, y: Vec<f64>) -> TraceSpec {
        TraceSpec {
            name: name.to_string(),
            x: (0..y.len()).map(|i| i as f64 * 10.0).collect(),
            y,
            kind,
            color: None,
            opacity: TRACE_OPACITY,
            line_width: TRACE_LINE_WIDTH,
            text: name.to_string(),
        }
    }

    #[test]
    fn ticks_follow_the_axis_interval() {
        assert_eq!(
            x_key_points(0.0, Some(10.0), &(-4.0..34.0)),
            vec![0.0, 10.0, 20.0, 30.0]
        );
        assert_eq!(
            x_key_points(0.0, Some(10.0), &(-25.0..5.0)),
            vec![-20.0, -10.0, 0.0]
        );
        assert_eq!(x_key_points(5.0, Some(10.0), &(0.0..20.0)), vec![5.0, 15.0]);
    }

    #[test]
    fn ticks_without_interval_or_too_dense_are_bounded() {
        assert_eq!(x_key_points(0.0, None, &(0.0..100.0)).len(), 11);
        assert!(x_key_points(0.0, Some(0.001), &(0.0..1000.0)).len() <= MAX_TICKS + 1);
        assert_eq!(x_key_points(0.0, Some(10.0), &(3.0..3.0)), vec![3.0]);
    }

    #[test]
    fn figure_without_data_is_not_rendered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        let layout = ChartBuilder::create_layout("Time", "Farmers", None);

        let empty = Figure::new(Vec::new(), layout.clone());
        assert!(matches!(
            StaticChartRenderer::render_png(&empty, &path, 400, 300),
            Err(ExportError::Empty)
        ));

        let gaps = Figure::new(vec![trace("a", PlotKind::Bar, vec![f64::NAN])], layout);
        assert!(matches!(
            StaticChartRenderer::render_png(&gaps, &path, 400, 300),
            Err(ExportError::Empty)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn stacked_bars_and_lines_render_to_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activity.png");
        let figure = Figure::new(
            vec![
                trace("KPI-total-investigations", PlotKind::Bar, vec![3.0, 4.0, 2.0]),
                trace("KPI-total-audits", PlotKind::Bar, vec![12.0, 11.0, 13.0]),
                trace("KPI-farmers-compliance", PlotKind::Scatter, vec![5.0, 6.0, 7.0]),
            ],
            ChartBuilder::create_layout("Simulation Time (weeks)", "Actions", Some(BarMode::Stack)),
        );

        match StaticChartRenderer::render_png(&figure, &path, 640, 480) {
            Ok(()) => assert!(fs_len(&path) > 0),
            // Hosts without system fonts cannot draw text.
            Err(ExportError::Draw(reason)) => eprintln!("skipping png check: {}", reason),
            Err(other) => panic!("unexpected export error: {}", other),
        }
    }

    fn fs_len(path: &Path) -> u64 {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}
