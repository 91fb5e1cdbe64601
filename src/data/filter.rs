use std::collections::BTreeSet;

use super::model::{Dataset, Entity, Indicator, Record};

// ---------------------------------------------------------------------------
// Selection: which entities and indicators the user has ticked
// ---------------------------------------------------------------------------

/// User selections for both filter dimensions.
///
/// Both constraints always apply: an empty set in either dimension selects
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub entities: BTreeSet<Entity>,
    pub indicators: BTreeSet<Indicator>,
}

impl Default for Selection {
    /// Everything selected.
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    pub fn all() -> Self {
        Self {
            entities: Entity::ALL.into_iter().collect(),
            indicators: Indicator::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            entities: BTreeSet::new(),
            indicators: BTreeSet::new(),
        }
    }

    pub fn new(
        entities: impl IntoIterator<Item = Entity>,
        indicators: impl IntoIterator<Item = Indicator>,
    ) -> Self {
        Self {
            entities: entities.into_iter().collect(),
            indicators: indicators.into_iter().collect(),
        }
    }

    pub fn toggle_entity(&mut self, entity: Entity) {
        if !self.entities.remove(&entity) {
            self.entities.insert(entity);
        }
    }

    pub fn toggle_indicator(&mut self, indicator: Indicator) {
        if !self.indicators.remove(&indicator) {
            self.indicators.insert(indicator);
        }
    }

    pub fn select_all_entities(&mut self) {
        self.entities = Entity::ALL.into_iter().collect();
    }

    pub fn select_no_entities(&mut self) {
        self.entities.clear();
    }

    pub fn select_all_indicators(&mut self) {
        self.indicators = Indicator::ALL.into_iter().collect();
    }

    pub fn select_no_indicators(&mut self) {
        self.indicators.clear();
    }

    /// Whether a record passes both constraints.
    pub fn matches(&self, record: &Record) -> bool {
        self.entities.contains(&record.entity()) && self.indicators.contains(&record.indicator())
    }
}

// ---------------------------------------------------------------------------
// FilteredView: read-only projection of the dataset
// ---------------------------------------------------------------------------

/// Records of a [`Dataset`] that pass a [`Selection`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Rebuild a view from indices computed earlier by [`filter`].
    /// Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        Self {
            dataset,
            indices: indices
                .iter()
                .copied()
                .filter(|&i| i < dataset.len())
                .collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().filter_map(move |&i| dataset.get(i))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Compliance values of the visible records.
    pub fn compliance(&self) -> Vec<f64> {
        self.iter().map(Record::compliance_pct).collect()
    }

    /// Distinct entities present in the view.
    pub fn distinct_entities(&self) -> BTreeSet<Entity> {
        self.iter().map(Record::entity).collect()
    }
}

/// Return the view of records whose entity AND indicator are selected.
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}
