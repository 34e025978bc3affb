//! Chart Plotter Module
//! Draws figures interactively using egui_plot.

use super::figure::{BarRect, Figure};
use super::layout::{Anchor, Orientation};
use super::trace::PlotKind;
use egui::text::LayoutJob;
use egui::{Align, Color32, FontId, Layout, RichText, Stroke, TextFormat};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, HLine, Line, Plot, PlotPoints, Points, VLine,
};

const DEFAULT_HEIGHT: f32 = 320.0;
const MARKER_RADIUS: f32 = 3.0;
const SCATTER_LINE_WIDTH: f32 = 1.5;

/// Renders a [`Figure`] inside an egui layout.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw `figure`; `id` must be unique among the plots shown in one frame.
    pub fn draw_figure(ui: &mut egui::Ui, id: &str, figure: &Figure) {
        let layout = &figure.layout;

        for annotation in &layout.annotations {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(&annotation.text)
                        .size(annotation.font_size as f32)
                        .strong(),
                );
            });
        }

        // egui_plot only places its legend in a plot corner, so the legend
        // is drawn as a row outside the plot at the requested anchor.
        let legend = Self::legend_job(figure);
        let legend_above = layout.legend.y >= 1.0;
        if legend_above {
            if let Some(job) = &legend {
                Self::show_legend(ui, job.clone(), layout.legend.xanchor);
            }
        }

        let mut plot = Plot::new(id)
            .x_axis_label(layout.x_axis.title.clone())
            .y_axis_label(layout.y_axis.title.clone())
            .allow_scroll(false);

        plot = match layout.size {
            Some((width, height)) => plot.width(width as f32).height(height as f32),
            None => plot.height(DEFAULT_HEIGHT),
        };

        if let Some(dtick) = layout.x_axis.dtick {
            plot = plot.x_grid_spacer(uniform_grid_spacer(move |_input| {
                [dtick, dtick * 5.0, dtick * 25.0]
            }));
        }

        let bar_rects = figure.bar_rects();

        plot.show(ui, |plot_ui| {
            if layout.x_axis.zeroline {
                plot_ui.vline(VLine::new(0.0).color(Color32::GRAY).width(1.0));
            }
            if layout.y_axis.zeroline {
                plot_ui.hline(HLine::new(0.0).color(Color32::GRAY).width(1.0));
            }

            for (i, (trace, rects)) in figure.traces.iter().zip(&bar_rects).enumerate() {
                let color = trace.resolved_color(i).to_color32(trace.opacity);

                match trace.kind {
                    PlotKind::Bar => {
                        let bars = Self::bars(rects, color, trace.line_width);
                        plot_ui.bar_chart(BarChart::new(bars).name(&trace.name).color(color));
                    }
                    PlotKind::Scatter => {
                        let points: Vec<[f64; 2]> = trace.points().map(|(x, y)| [x, y]).collect();
                        plot_ui.line(
                            Line::new(PlotPoints::from_iter(points.iter().copied()))
                                .color(color)
                                .width(SCATTER_LINE_WIDTH)
                                .name(&trace.name),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from_iter(points.into_iter()))
                                .radius(MARKER_RADIUS)
                                .color(color)
                                .name(&trace.name),
                        );
                    }
                }
            }
        });

        if !legend_above {
            if let Some(job) = legend {
                Self::show_legend(ui, job, layout.legend.xanchor);
            }
        }
    }

    /// One egui bar per rectangle, each carrying its own base so stacks
    /// line up by x even when a lower trace has gaps.
    fn bars(rects: &[BarRect], color: Color32, line_width: f32) -> Vec<Bar> {
        rects
            .iter()
            .map(|r| {
                Bar::new((r.x0 + r.x1) / 2.0, r.y1 - r.y0)
                    .width(r.x1 - r.x0)
                    .base_offset(r.y0)
                    .fill(color)
                    .stroke(Stroke::new(line_width, color))
            })
            .collect()
    }

    /// Legend entries as one text job: a colored marker and the trace name.
    fn legend_job(figure: &Figure) -> Option<LayoutJob> {
        let legend = &figure.layout.legend;
        if !figure.layout.show_legend || figure.traces.is_empty() {
            return None;
        }

        let mut entries: Vec<usize> = (0..figure.traces.len()).collect();
        if !legend.normal_order {
            entries.reverse();
        }
        let separator = match legend.orientation {
            Orientation::Horizontal => "    ",
            Orientation::Vertical => "\n",
        };

        let font = FontId::proportional(legend.font_size as f32);
        let mut job = LayoutJob::default();
        for (n, &i) in entries.iter().enumerate() {
            let trace = &figure.traces[i];
            let marker = match trace.kind {
                PlotKind::Bar => "■ ",
                PlotKind::Scatter => "● ",
            };
            if n > 0 {
                job.append(separator, 0.0, TextFormat::simple(font.clone(), Color32::GRAY));
            }
            job.append(
                marker,
                0.0,
                TextFormat::simple(font.clone(), trace.resolved_color(i).to_color32(1.0)),
            );
            job.append(&trace.name, 0.0, TextFormat::simple(font.clone(), Color32::GRAY));
        }
        Some(job)
    }

    fn show_legend(ui: &mut egui::Ui, job: LayoutJob, anchor: Anchor) {
        let align = match anchor {
            Anchor::Left => Align::Min,
            Anchor::Right => Align::Max,
            _ => Align::Center,
        };
        ui.with_layout(Layout::top_down(align), |ui| {
            ui.label(job);
        });
    }
}
