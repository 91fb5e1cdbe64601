use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints, Points};

use pbr_dashboard::analysis::aggregate::AggregateRow;
use pbr_dashboard::analysis::observations::NO_DATA_MESSAGE;
use pbr_dashboard::color::sequential_color;
use pbr_dashboard::data::generator::ACHIEVED_RANGE;
use pbr_dashboard::data::model::Entity;
use pbr_dashboard::state::AppState;

use super::report::metric_pair;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Scatter: programmed vs achieved target
// ---------------------------------------------------------------------------

/// Target vs achieved, one series per entity, with the 1:1 reference line.
pub fn target_scatter(ui: &mut Ui, state: &AppState) {
    ui.heading("Target achievement by entity");

    let view = state.view();

    Plot::new("target_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Target (%)")
        .y_axis_label("Achieved (%)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for entity in Entity::ALL {
                let points: Vec<[f64; 2]> = view
                    .iter()
                    .filter(|r| r.entity() == entity)
                    .map(|r| [r.target_pct(), r.achieved_pct()])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(entity.label())
                        .color(state.color_map.color_for(entity))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }

            let (lo, hi) = (ACHIEVED_RANGE.start, ACHIEVED_RANGE.end);
            let diagonal: PlotPoints = vec![[lo, lo], [hi, hi]].into();
            plot_ui.line(
                Line::new(diagonal)
                    .color(Color32::GRAY)
                    .style(LineStyle::dashed_loose()),
            );
        });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Bar charts: mean compliance per group
// ---------------------------------------------------------------------------

pub fn indicator_bars(ui: &mut Ui, state: &AppState) {
    ui.heading("Compliance by indicator");
    let vm = &state.view_model;
    if vm.is_empty() {
        ui.label(NO_DATA_MESSAGE);
        return;
    }
    compliance_bars(ui, "indicator_bars", &vm.by_indicator);
    if let (Some(best), Some(worst)) = (vm.best_indicator(), vm.worst_indicator()) {
        metric_pair(ui, ("Best indicator", best), ("Worst indicator", worst));
    }
    ui.add_space(8.0);
}

pub fn entity_bars(ui: &mut Ui, state: &AppState) {
    ui.heading("Compliance by entity");
    let vm = &state.view_model;
    if vm.is_empty() {
        ui.label(NO_DATA_MESSAGE);
        return;
    }
    compliance_bars(ui, "entity_bars", &vm.by_entity);
    if let (Some(best), Some(worst)) = (vm.best_entity(), vm.worst_entity()) {
        metric_pair(
            ui,
            ("Highest-compliance entity", best),
            ("Lowest-compliance entity", worst),
        );
    }
    ui.add_space(8.0);
}

/// One bar per row at x = 0, 1, 2…, coloured on a sequential scale.
fn compliance_bars(ui: &mut Ui, id: &str, rows: &[AggregateRow]) {
    let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.mean_compliance_pct), hi.max(r.mean_compliance_pct))
    });

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.mean_compliance_pct)
                .name(r.group.label())
                .fill(sequential_color(r.mean_compliance_pct, min, max))
                .width(0.7)
        })
        .collect();

    let labels: Vec<&'static str> = rows.iter().map(|r| r.group.label()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label("Compliance (%)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels
                .get(idx as usize)
                .map(|l| l.to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
