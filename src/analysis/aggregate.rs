use std::collections::BTreeMap;
use std::fmt;

use crate::data::filter::FilteredView;
use crate::data::model::{Entity, Indicator, Record};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Attribute a view can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Entity,
    Indicator,
}

/// Value of the grouping attribute for one aggregate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Entity(Entity),
    Indicator(Indicator),
}

impl GroupKey {
    fn of(record: &Record, group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Entity => GroupKey::Entity(record.entity()),
            GroupBy::Indicator => GroupKey::Indicator(record.indicator()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKey::Entity(e) => e.label(),
            GroupKey::Indicator(i) => i.label(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean compliance of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub group: GroupKey,
    pub mean_compliance_pct: f64,
    pub count: usize,
}

/// Mean compliance per distinct group value present in the view, highest
/// first. Equal means keep the enumeration order of their keys.
///
/// An empty view yields no rows.
pub fn aggregate_by(view: &FilteredView<'_>, group_by: GroupBy) -> Vec<AggregateRow> {
    if view.is_empty() {
        return Vec::new();
    }

    let mut sums: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();
    for r in view.iter() {
        let e = sums.entry(GroupKey::of(r, group_by)).or_insert((0.0, 0));
        e.0 += r.compliance_pct();
        e.1 += 1;
    }

    let mut rows: Vec<AggregateRow> = sums
        .into_iter()
        .map(|(group, (sum, count))| AggregateRow {
            group,
            mean_compliance_pct: sum / count as f64,
            count,
        })
        .collect();
    // Stable sort: ties stay in key order from the BTreeMap.
    rows.sort_by(|a, b| b.mean_compliance_pct.total_cmp(&a.mean_compliance_pct));
    rows
}

/// Best (first) and worst (last) rows of a sorted aggregate, or `None` when
/// there is no data.
pub fn best_and_worst(rows: &[AggregateRow]) -> Option<(&AggregateRow, &AggregateRow)> {
    Some((rows.first()?, rows.last()?))
}

// ---------------------------------------------------------------------------
// Whole-view statistics
// ---------------------------------------------------------------------------

/// Scalar statistics of compliance over a non-empty view.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation; `None` below two rows.
    pub std_dev: Option<f64>,
}

/// `None` for an empty view.
pub fn summarize(view: &FilteredView<'_>) -> Option<SummaryStats> {
    summarize_values(&view.compliance())
}

pub(crate) fn summarize_values(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let std_dev = (count >= 2).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });
    Some(SummaryStats {
        count,
        mean,
        max,
        min,
        std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, Selection};
    use crate::data::model::Dataset;

    /// Target 100 makes compliance equal to the achieved value.
    fn rec(entity: Entity, indicator: Indicator, compliance: f64) -> Record {
        Record::new(entity, indicator, 100.0, compliance)
    }

    #[test]
    fn mean_per_group() {
        let ds = Dataset::from_records(vec![
            rec(Entity::Cdmx, Indicator::BasicEducation, 80.0),
            rec(Entity::Edomex, Indicator::BasicEducation, 90.0),
            rec(Entity::Jalisco, Indicator::BasicEducation, 100.0),
        ]);
        let view = filter(&ds, &Selection::all());
        let rows = aggregate_by(&view, GroupBy::Indicator);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group, GroupKey::Indicator(Indicator::BasicEducation));
        assert_eq!(rows[0].mean_compliance_pct, 90.0);
        assert_eq!(rows[0].count, 3);
    }

    #[test]
    fn rows_sorted_descending_with_best_first() {
        let ds = Dataset::from_records(vec![
            rec(Entity::Cdmx, Indicator::BasicEducation, 70.0),
            rec(Entity::Puebla, Indicator::HealthCoverage, 110.0),
            rec(Entity::Cdmx, Indicator::PublicSecurity, 95.0),
            rec(Entity::Veracruz, Indicator::HealthCoverage, 100.0),
        ]);
        let view = filter(&ds, &Selection::all());

        let by_entity = aggregate_by(&view, GroupBy::Entity);
        assert!(by_entity
            .windows(2)
            .all(|w| w[0].mean_compliance_pct >= w[1].mean_compliance_pct));
        let (best, worst) = best_and_worst(&by_entity).unwrap();
        assert_eq!(best.group, GroupKey::Entity(Entity::Puebla));
        assert_eq!(worst.group, GroupKey::Entity(Entity::Cdmx));
        assert_eq!(worst.mean_compliance_pct, 82.5);

        let by_indicator = aggregate_by(&view, GroupBy::Indicator);
        let labels: Vec<&str> = by_indicator.iter().map(|r| r.group.label()).collect();
        assert_eq!(
            labels,
            ["Health Coverage", "Public Security", "Basic Education"]
        );
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let ds = Dataset::from_records(vec![
            rec(Entity::Puebla, Indicator::BasicEducation, 90.0),
            rec(Entity::Cdmx, Indicator::BasicEducation, 90.0),
        ]);
        let view = filter(&ds, &Selection::all());
        let rows = aggregate_by(&view, GroupBy::Entity);
        assert_eq!(rows[0].group, GroupKey::Entity(Entity::Cdmx));
        assert_eq!(rows[1].group, GroupKey::Entity(Entity::Puebla));
    }

    #[test]
    fn empty_view_reports_no_data() {
        let ds = Dataset::from_records(vec![rec(Entity::Cdmx, Indicator::BasicEducation, 90.0)]);
        let view = filter(&ds, &Selection::none());
        assert!(aggregate_by(&view, GroupBy::Entity).is_empty());
        assert!(aggregate_by(&view, GroupBy::Indicator).is_empty());
        assert!(best_and_worst(&[]).is_none());
        assert!(summarize(&view).is_none());
    }

    #[test]
    fn summary_statistics() {
        let stats = summarize_values(&[50.0, 95.0, 130.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max, 130.0);
        assert_eq!(stats.min, 50.0);
        assert!((stats.mean - 91.666_666).abs() < 1e-4);
        let sd = stats.std_dev.unwrap();
        assert!((sd - 40.104_03).abs() < 1e-3, "{sd}");

        let tight = summarize_values(&[89.0, 90.0, 91.0]).unwrap();
        assert_eq!(tight.std_dev, Some(1.0));
    }

    #[test]
    fn single_row_has_no_std_dev() {
        let stats = summarize_values(&[97.5]).unwrap();
        assert_eq!(stats.mean, 97.5);
        assert_eq!(stats.std_dev, None);
    }
}
