use std::path::Path;

use anyhow::Context;

use crate::analysis::observations::Thresholds;
use crate::color::ColorMap;
use crate::data::filter::{FilteredView, Selection};
use crate::data::generator::{generate, GeneratorConfig};
use crate::data::model::{Dataset, Entity, Indicator};
use crate::export::{self, ExportFormat};
use crate::report::{render, ViewModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Outcome of the last user action, shown in the top bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Generated once at startup, never mutated.
    pub dataset: Dataset,

    /// Ticked entities and indicators.
    pub selection: Selection,

    pub thresholds: Thresholds,

    /// Result of the last recomputation.
    pub view_model: ViewModel,

    /// Per-entity colours.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default(), Thresholds::default())
    }
}

impl AppState {
    pub fn new(config: &GeneratorConfig, thresholds: Thresholds) -> Self {
        let dataset = generate(config);
        log::info!(
            "Generated {} records (seed {})",
            dataset.len(),
            config.seed
        );
        let selection = Selection::all();
        let view_model = render(&dataset, &selection, &thresholds);
        Self {
            dataset,
            selection,
            thresholds,
            view_model,
            color_map: ColorMap::default(),
            status: None,
        }
    }

    /// Recompute the view model after a selection change.
    pub fn refilter(&mut self) {
        self.view_model = render(&self.dataset, &self.selection, &self.thresholds);
        log::debug!(
            "{} of {} records visible",
            self.view_model.visible_indices.len(),
            self.view_model.total_records
        );
    }

    pub fn view(&self) -> FilteredView<'_> {
        self.view_model.view(&self.dataset)
    }

    pub fn toggle_entity(&mut self, entity: Entity) {
        self.selection.toggle_entity(entity);
        self.refilter();
    }

    pub fn toggle_indicator(&mut self, indicator: Indicator) {
        self.selection.toggle_indicator(indicator);
        self.refilter();
    }

    pub fn select_all_entities(&mut self) {
        self.selection.select_all_entities();
        self.refilter();
    }

    pub fn select_no_entities(&mut self) {
        self.selection.select_no_entities();
        self.refilter();
    }

    pub fn select_all_indicators(&mut self) {
        self.selection.select_all_indicators();
        self.refilter();
    }

    pub fn select_no_indicators(&mut self) {
        self.selection.select_no_indicators();
        self.refilter();
    }

    /// Write the visible rows to `path` and record the outcome in `status`.
    pub fn export_to(&mut self, path: &Path, format: ExportFormat) -> anyhow::Result<()> {
        let result = export::save(&self.view(), path, format)
            .with_context(|| format!("exporting to {}", path.display()));
        self.status = Some(match &result {
            Ok(()) => Status::Info(format!(
                "Exported {} rows to {}",
                self.view_model.visible_indices.len(),
                path.display()
            )),
            Err(e) => Status::Error(format!("Error: {e:#}")),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_everything_visible() {
        let state = AppState::default();
        assert_eq!(state.dataset.len(), 50);
        assert_eq!(state.view().len(), 50);
        assert!(state.status.is_none());
    }

    #[test]
    fn selection_changes_recompute_view() {
        let mut state = AppState::default();
        state.select_no_entities();
        assert!(state.view_model.is_empty());

        state.toggle_entity(Entity::Cdmx);
        let expected = state
            .dataset
            .records()
            .iter()
            .filter(|r| r.entity() == Entity::Cdmx)
            .count();
        assert_eq!(state.view().len(), expected);

        state.select_no_indicators();
        assert!(state.view_model.is_empty());
        state.select_all_indicators();
        state.select_all_entities();
        assert_eq!(state.view().len(), 50);

        state.toggle_indicator(Indicator::BasicEducation);
        assert!(state
            .view()
            .iter()
            .all(|r| r.indicator() != Indicator::BasicEducation));
    }

    #[test]
    fn export_records_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();

        let path = dir.path().join(export::CSV_FILE_NAME);
        state.export_to(&path, ExportFormat::Csv).unwrap();
        assert!(matches!(state.status, Some(Status::Info(_))));

        let missing = dir.path().join("no-such-dir").join(export::XLSX_FILE_NAME);
        assert!(state.export_to(&missing, ExportFormat::Xlsx).is_err());
        assert!(matches!(state.status, Some(Status::Error(_))));
    }

    #[test]
    fn failed_export_status_names_path_and_cause() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        let missing = dir.path().join("no-such-dir").join("x.csv");
        let cause = std::fs::write(&missing, b"").unwrap_err().to_string();

        assert!(state.export_to(&missing, ExportFormat::Csv).is_err());
        let Some(Status::Error(message)) = &state.status else {
            panic!("expected an error status, got {:?}", state.status);
        };
        assert!(message.contains(&missing.display().to_string()), "{message}");
        assert!(message.contains(&cause), "{message}");
    }
}
