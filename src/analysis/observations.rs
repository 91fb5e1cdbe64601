use std::fmt;

use crate::data::filter::FilteredView;
use crate::data::model::Entity;

use super::aggregate::{summarize, SummaryStats};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Compliance boundaries used by the classifier, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Means strictly above this are excellent.
    pub excellent: f64,
    /// Means strictly above this are satisfactory.
    pub satisfactory: f64,
    /// Means strictly above this are acceptable; anything lower is critical.
    pub acceptable: f64,
    /// Kept alongside the others but not a band boundary: the critical band
    /// already covers every mean at or below `acceptable`.
    pub critical: f64,
    /// Sample standard deviation above which a view is flagged as highly
    /// variable.
    pub high_variability_std: f64,
    /// Rows above this compliance trigger the over-target note.
    pub over_target: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            excellent: 105.0,
            satisfactory: 95.0,
            acceptable: 85.0,
            critical: 70.0,
            high_variability_std: 15.0,
            over_target: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Bands and the ordered rule table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Excellent,
    Satisfactory,
    Acceptable,
    Critical,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Band::Excellent => "Excellent",
            Band::Satisfactory => "Satisfactory",
            Band::Acceptable => "Acceptable",
            Band::Critical => "Critical",
        })
    }
}

struct BandRule {
    band: Band,
    applies: fn(f64, &Thresholds) -> bool,
}

fn above_excellent(mean: f64, t: &Thresholds) -> bool {
    mean > t.excellent
}

fn above_satisfactory(mean: f64, t: &Thresholds) -> bool {
    mean > t.satisfactory
}

fn above_acceptable(mean: f64, t: &Thresholds) -> bool {
    mean > t.acceptable
}

fn any_mean(_: f64, _: &Thresholds) -> bool {
    true
}

/// Evaluated top-down; the first matching rule wins.
const BAND_RULES: [BandRule; 4] = [
    BandRule {
        band: Band::Excellent,
        applies: above_excellent,
    },
    BandRule {
        band: Band::Satisfactory,
        applies: above_satisfactory,
    },
    BandRule {
        band: Band::Acceptable,
        applies: above_acceptable,
    },
    BandRule {
        band: Band::Critical,
        applies: any_mean,
    },
];

/// Band for a mean compliance value.
pub fn classify_band(mean: f64, thresholds: &Thresholds) -> Band {
    BAND_RULES
        .iter()
        .find(|rule| (rule.applies)(mean, thresholds))
        .map_or(Band::Critical, |rule| rule.band)
}

impl Band {
    pub fn severity(self) -> Severity {
        match self {
            Band::Excellent | Band::Satisfactory => Severity::Success,
            Band::Acceptable => Severity::Info,
            Band::Critical => Severity::Error,
        }
    }

    fn entity_observation(self, entity: Entity, mean: f64) -> Observation {
        let (headline, recommendation) = match self {
            Band::Excellent => (
                format!("Excellent performance: {entity} consistently exceeds its targets (average: {mean:.2}%)."),
                "Recommendation: Document good practices and consider replicating them in other entities.",
            ),
            Band::Satisfactory => (
                format!("Satisfactory performance: {entity} meets expectations (average: {mean:.2}%)."),
                "Recommendation: Identify the indicators with lower compliance to improve consistency.",
            ),
            Band::Acceptable => (
                format!("Acceptable performance: {entity} has areas of opportunity (average: {mean:.2}%)."),
                "Recommendation: Implement improvement plans focused on the critical indicators.",
            ),
            Band::Critical => (
                format!("Critical performance: {entity} requires immediate attention (average: {mean:.2}%)."),
                "Recommendation: Comprehensive review of strategies and resource allocation.",
            ),
        };
        Observation::new(self.severity(), headline).with_detail(recommendation)
    }

    fn global_observation(self, mean: f64) -> Observation {
        let (headline, recommendation) = match self {
            Band::Excellent => (
                format!("Excellent global compliance: {mean:.2}% (exceeds expectations)"),
                "Recommendation: Consider raising targets for the next period.",
            ),
            Band::Satisfactory => (
                format!("Satisfactory global compliance: {mean:.2}% (within the expected range)"),
                "Recommendation: Optimise processes in indicators with average performance.",
            ),
            Band::Acceptable => (
                format!("Acceptable global compliance: {mean:.2}% (requires focused improvements)"),
                "Recommendation: Implement mentoring between entities and review resource allocation.",
            ),
            Band::Critical => (
                format!("Insufficient global compliance: {mean:.2}% (below expectations)"),
                "Recommendation: Urgent strategic review, possibly redefining targets and resources.",
            ),
        };
        Observation::new(self.severity(), headline).with_detail(recommendation)
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// One narrative callout: a headline plus supporting lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub severity: Severity,
    pub headline: String,
    pub details: Vec<String>,
}

impl Observation {
    fn new(severity: Severity, headline: impl Into<String>) -> Self {
        Self {
            severity,
            headline: headline.into(),
            details: Vec::new(),
        }
    }

    fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }
}

pub const NO_DATA_MESSAGE: &str =
    "No data available with the current filters. Adjust the selection criteria.";

/// Result of classifying one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// The filters exclude every record; nothing was computed.
    NoData,
    /// Exactly one entity is visible.
    SingleEntity {
        entity: Entity,
        mean: f64,
        band: Band,
        observations: Vec<Observation>,
    },
    /// Several entities are visible.
    MultiEntity {
        stats: SummaryStats,
        band: Band,
        high_variability: bool,
        over_target: bool,
        observations: Vec<Observation>,
    },
}

impl Assessment {
    pub fn band(&self) -> Option<Band> {
        match self {
            Assessment::NoData => None,
            Assessment::SingleEntity { band, .. } | Assessment::MultiEntity { band, .. } => {
                Some(*band)
            }
        }
    }

    /// Callouts in display order. `NoData` yields a single warning.
    pub fn observations(&self) -> Vec<Observation> {
        match self {
            Assessment::NoData => vec![Observation::new(Severity::Warning, NO_DATA_MESSAGE)],
            Assessment::SingleEntity { observations, .. }
            | Assessment::MultiEntity { observations, .. } => observations.clone(),
        }
    }
}

/// Classify a view into a narrative assessment.
pub fn classify(view: &FilteredView<'_>, thresholds: &Thresholds) -> Assessment {
    let Some(stats) = summarize(view) else {
        return Assessment::NoData;
    };

    let entities = view.distinct_entities();
    if let (1, Some(&entity)) = (entities.len(), entities.first()) {
        let band = classify_band(stats.mean, thresholds);
        return Assessment::SingleEntity {
            entity,
            mean: stats.mean,
            band,
            observations: vec![band.entity_observation(entity, stats.mean)],
        };
    }

    let over_target = view
        .iter()
        .any(|r| r.compliance_pct() > thresholds.over_target);
    classify_global(stats, over_target, thresholds)
}

fn classify_global(stats: SummaryStats, over_target: bool, thresholds: &Thresholds) -> Assessment {
    let mut observations = Vec::new();

    let high_variability = match stats.std_dev {
        Some(sd) if sd > thresholds.high_variability_std => {
            observations.push(
                Observation::new(
                    Severity::Warning,
                    "High variability in compliance: there are large differences between entities/indicators.",
                )
                .with_detail("Recommendation: Standardise processes in low-performing entities and replicate good practices."),
            );
            true
        }
        Some(_) => false,
        None => {
            observations.push(Observation::new(
                Severity::Info,
                "Insufficient data for variability analysis.",
            ));
            false
        }
    };

    let band = classify_band(stats.mean, thresholds);
    observations.push(band.global_observation(stats.mean));

    observations.push(
        Observation::new(Severity::Info, format!("Highest compliance: {:.2}%", stats.max))
            .with_detail("Possible causes: good practices, adequate resources, realistic targets"),
    );
    observations.push(
        Observation::new(Severity::Info, format!("Lowest compliance: {:.2}%", stats.min))
            .with_detail("Possible causes: underestimated resources, ambitious targets, operational problems"),
    );

    if over_target {
        observations.push(
            Observation::new(
                Severity::Info,
                format!(
                    "Some entities/indicators exceed {:.0}% compliance. Consider:",
                    thresholds.over_target
                ),
            )
            .with_detail("Were the programmed targets too conservative?")
            .with_detail("Can these successful experiences be capitalised on?"),
        );
    }

    Assessment::MultiEntity {
        stats,
        band,
        high_variability,
        over_target,
        observations,
    }
}
