use eframe::egui::{Id, RichText, ScrollArea, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::chart::{ChartSpec, Panel};
use crate::color::ColorMap;
use crate::data::model::DateRange;
use crate::state::AppState;

const PANEL_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the headings and every chart in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("UK Housing Market Analysis");
            ui.label("Interest rates, house prices, population, housing supply, wages and inflation.");
            ui.add_space(8.0);

            for chart in &state.charts {
                chart_view(ui, chart, state.selection.range);
                ui.add_space(16.0);
            }
        });
}

fn chart_view(ui: &mut Ui, chart: &ChartSpec, range: DateRange) {
    ui.strong(RichText::new(&chart.title).size(16.0));

    if chart.is_empty() {
        ui.label(RichText::new("No data for this selection.").italics());
    } else {
        for (i, panel) in chart.panels.iter().enumerate() {
            panel_plot(ui, chart.id, i, panel, range);
        }
    }

    if let Some(note) = &chart.note {
        ui.label(note);
    }
    ui.small(&chart.caption);
}

/// One fixed-domain line plot. Panels of the same chart share their X axis.
fn panel_plot(ui: &mut Ui, chart_id: &str, index: usize, panel: &Panel, range: DateRange) {
    let names = panel.series_names();
    let colors = ColorMap::new(&names);

    Plot::new((chart_id, index))
        .height(PANEL_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(panel.y_label.clone())
        .include_x(range.start as f64)
        .include_x(range.end as f64)
        .include_y(panel.domain.min)
        .include_y(panel.domain.max)
        .link_axis(Id::new(chart_id), [true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for name in &names {
                let color = colors.color_for(name);
                for segment in panel.segments(name) {
                    // A lone point between gaps has no line to draw.
                    if segment.len() == 1 {
                        plot_ui.points(
                            Points::new(PlotPoints::from(segment))
                                .name(*name)
                                .color(color)
                                .radius(2.5),
                        );
                    } else {
                        plot_ui.line(
                            Line::new(PlotPoints::from(segment))
                                .name(*name)
                                .color(color)
                                .width(2.0),
                        );
                    }
                }
            }
        });
}
