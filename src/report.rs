use crate::analysis::aggregate::{aggregate_by, best_and_worst, summarize, AggregateRow, GroupBy, SummaryStats};
use crate::analysis::observations::{classify, Assessment, Thresholds};
use crate::data::filter::{filter, FilteredView, Selection};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// View model: everything the dashboard shows for one selection
// ---------------------------------------------------------------------------

/// Output of one full recomputation. Owns no borrow of the dataset, so it
/// can live in the UI state between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub total_records: usize,
    /// Dataset indices passing the selection.
    pub visible_indices: Vec<usize>,
    /// `None` when nothing is visible.
    pub summary: Option<SummaryStats>,
    pub by_indicator: Vec<AggregateRow>,
    pub by_entity: Vec<AggregateRow>,
    pub assessment: Assessment,
}

/// Filter, aggregate and classify in one pass.
pub fn render(dataset: &Dataset, selection: &Selection, thresholds: &Thresholds) -> ViewModel {
    let view = filter(dataset, selection);
    ViewModel {
        total_records: dataset.len(),
        visible_indices: view.indices().to_vec(),
        summary: summarize(&view),
        by_indicator: aggregate_by(&view, GroupBy::Indicator),
        by_entity: aggregate_by(&view, GroupBy::Entity),
        assessment: classify(&view, thresholds),
    }
}

impl ViewModel {
    /// Borrow the visible rows back out of the dataset they came from.
    pub fn view<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        FilteredView::from_indices(dataset, &self.visible_indices)
    }

    pub fn is_empty(&self) -> bool {
        self.visible_indices.is_empty()
    }

    pub fn best_indicator(&self) -> Option<&AggregateRow> {
        best_and_worst(&self.by_indicator).map(|(best, _)| best)
    }

    pub fn worst_indicator(&self) -> Option<&AggregateRow> {
        best_and_worst(&self.by_indicator).map(|(_, worst)| worst)
    }

    pub fn best_entity(&self) -> Option<&AggregateRow> {
        best_and_worst(&self.by_entity).map(|(best, _)| best)
    }

    pub fn worst_entity(&self) -> Option<&AggregateRow> {
        best_and_worst(&self.by_entity).map(|(_, worst)| worst)
    }
}
