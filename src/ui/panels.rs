use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use pbr_dashboard::data::model::{Entity, Indicator};
use pbr_dashboard::export::ExportFormat;
use pbr_dashboard::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A checkbox toggled, or one of the All/None buttons pressed.
enum FilterEvent<T> {
    Toggle(T),
    All,
    None,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut entity_event = None;
    let mut indicator_event = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let color_map = &state.color_map;
            entity_event = multi_select(
                ui,
                "Entities",
                &Entity::ALL,
                &state.selection.entities,
                |e| Some(color_map.color_for(*e)),
            );
            indicator_event = multi_select(
                ui,
                "Indicators",
                &Indicator::ALL,
                &state.selection.indicators,
                |_| None,
            );
        });

    // Apply after the widgets have released their borrows of `state`.
    match entity_event {
        Some(FilterEvent::Toggle(e)) => state.toggle_entity(e),
        Some(FilterEvent::All) => state.select_all_entities(),
        Some(FilterEvent::None) => state.select_no_entities(),
        None => {}
    }
    match indicator_event {
        Some(FilterEvent::Toggle(i)) => state.toggle_indicator(i),
        Some(FilterEvent::All) => state.select_all_indicators(),
        Some(FilterEvent::None) => state.select_no_indicators(),
        None => {}
    }
}

/// Collapsible checkbox group with an "n/total" header and All/None buttons.
fn multi_select<T>(
    ui: &mut Ui,
    title: &str,
    options: &[T],
    selected: &BTreeSet<T>,
    color_of: impl Fn(&T) -> Option<Color32>,
) -> Option<FilterEvent<T>>
where
    T: Copy + Ord + Display,
{
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());
    let mut event = None;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    event = Some(FilterEvent::All);
                }
                if ui.small_button("None").clicked() {
                    event = Some(FilterEvent::None);
                }
            });

            for value in options {
                let mut text = RichText::new(value.to_string());
                if let Some(c) = color_of(value) {
                    text = text.color(c);
                }
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, text).changed() {
                    event = Some(FilterEvent::Toggle(*value));
                }
            }
        });

    event
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export CSV…").clicked() {
                export_dialog(state, ExportFormat::Csv);
                ui.close_menu();
            }
            if ui.button("Export Excel…").clicked() {
                export_dialog(state, ExportFormat::Xlsx);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records, {} visible",
            state.view_model.total_records,
            state.view_model.visible_indices.len()
        ));

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
            }
            Some(Status::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState, format: ExportFormat) {
    let (filter_name, title) = match format {
        ExportFormat::Csv => ("CSV", "Export filtered data as CSV"),
        ExportFormat::Xlsx => ("Excel", "Export filtered data as Excel"),
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(format.default_file_name())
        .add_filter(filter_name, &[format.extension()])
        .save_file();

    let Some(path) = file else {
        return;
    };

    if let Err(e) = state.export_to(&path, format) {
        log::error!("Failed to export: {e:#}");
    }
}
