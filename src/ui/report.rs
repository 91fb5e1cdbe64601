use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use pbr_dashboard::analysis::aggregate::AggregateRow;
use pbr_dashboard::analysis::observations::{Assessment, Severity};
use pbr_dashboard::data::model::COLUMN_HEADERS;
use pbr_dashboard::state::AppState;

// ---------------------------------------------------------------------------
// Static header
// ---------------------------------------------------------------------------

pub fn intro(ui: &mut Ui) {
    ui.heading("PBR-SED Performance Evaluation");
    ui.label(
        "Simulated analysis of target compliance across entities and policy \
         indicators. Use the filters on the left; every chart, metric and \
         observation below follows the current selection.",
    );
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Target compliance table");

    let rows: Vec<_> = state.view().iter().collect();
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size + 6.0;

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(260.0)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(180.0))
        .columns(Column::auto().at_least(90.0), 3)
        .header(22.0, |mut header| {
            for title in COLUMN_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                let r = rows[row.index()];
                row.col(|ui| {
                    ui.label(r.entity().label());
                });
                row.col(|ui| {
                    ui.label(r.indicator().label());
                });
                for value in [r.target_pct(), r.achieved_pct(), r.compliance_pct()] {
                    row.col(|ui| {
                        ui.label(format!("{value:.2}"));
                    });
                }
            });
        });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Metric callouts
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: &str, detail: Option<&str>) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).weak());
            ui.label(RichText::new(value).size(22.0).strong());
            if let Some(d) = detail {
                ui.label(d);
            }
        });
    });
}

pub fn overall_metric(ui: &mut Ui, state: &AppState) {
    if let Some(stats) = &state.view_model.summary {
        metric(
            ui,
            "Overall average compliance (%)",
            &format!("{:.2} %", stats.mean),
            None,
        );
        ui.add_space(8.0);
    }
}

/// Best and worst group side by side.
pub fn metric_pair(ui: &mut Ui, left: (&str, &AggregateRow), right: (&str, &AggregateRow)) {
    ui.columns(2, |cols| {
        for (col, (label, row)) in cols.iter_mut().zip([left, right]) {
            metric(
                col,
                label,
                row.group.label(),
                Some(&format!("{:.2} %", row.mean_compliance_pct)),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Success => Color32::from_rgb(46, 160, 67),
        Severity::Info => Color32::from_rgb(56, 139, 253),
        Severity::Warning => Color32::from_rgb(210, 153, 34),
        Severity::Error => Color32::from_rgb(248, 81, 73),
    }
}

pub fn observations(ui: &mut Ui, state: &AppState) {
    ui.heading("Automatic observations");

    if let Assessment::SingleEntity { entity, .. } = &state.view_model.assessment {
        ui.strong(format!("Specific analysis for {entity}:"));
    }

    for obs in state.view_model.assessment.observations() {
        let color = severity_color(obs.severity);
        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.0, color))
            .show(ui, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(&obs.headline).color(color).strong());
                for line in &obs.details {
                    ui.label(line);
                }
            });
        ui.add_space(4.0);
    }
}
