use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Entity / Indicator – the two closed enumerations records are keyed by
// ---------------------------------------------------------------------------

/// A territorial jurisdiction. Declaration order is the display order and the
/// tie-break order used when sorting aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Entity {
    #[serde(rename = "CDMX")]
    Cdmx,
    #[serde(rename = "Edomex")]
    Edomex,
    #[serde(rename = "Jalisco")]
    Jalisco,
    #[serde(rename = "Nuevo León")]
    NuevoLeon,
    #[serde(rename = "Veracruz")]
    Veracruz,
    #[serde(rename = "Puebla")]
    Puebla,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::Cdmx,
        Entity::Edomex,
        Entity::Jalisco,
        Entity::NuevoLeon,
        Entity::Veracruz,
        Entity::Puebla,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Entity::Cdmx => "CDMX",
            Entity::Edomex => "Edomex",
            Entity::Jalisco => "Jalisco",
            Entity::NuevoLeon => "Nuevo León",
            Entity::Veracruz => "Veracruz",
            Entity::Puebla => "Puebla",
        }
    }
}

/// A policy domain being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "Basic Education")]
    BasicEducation,
    #[serde(rename = "Health Coverage")]
    HealthCoverage,
    #[serde(rename = "Public Security")]
    PublicSecurity,
    #[serde(rename = "Road Infrastructure")]
    RoadInfrastructure,
    #[serde(rename = "Vulnerable Groups Support")]
    VulnerableGroupsSupport,
    #[serde(rename = "Housing Access")]
    HousingAccess,
    #[serde(rename = "Basic Sanitation")]
    BasicSanitation,
    #[serde(rename = "Formal Employment")]
    FormalEmployment,
    #[serde(rename = "Gender Equality")]
    GenderEquality,
    #[serde(rename = "Internet Access")]
    InternetAccess,
}

impl Indicator {
    pub const ALL: [Indicator; 10] = [
        Indicator::BasicEducation,
        Indicator::HealthCoverage,
        Indicator::PublicSecurity,
        Indicator::RoadInfrastructure,
        Indicator::VulnerableGroupsSupport,
        Indicator::HousingAccess,
        Indicator::BasicSanitation,
        Indicator::FormalEmployment,
        Indicator::GenderEquality,
        Indicator::InternetAccess,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Indicator::BasicEducation => "Basic Education",
            Indicator::HealthCoverage => "Health Coverage",
            Indicator::PublicSecurity => "Public Security",
            Indicator::RoadInfrastructure => "Road Infrastructure",
            Indicator::VulnerableGroupsSupport => "Vulnerable Groups Support",
            Indicator::HousingAccess => "Housing Access",
            Indicator::BasicSanitation => "Basic Sanitation",
            Indicator::FormalEmployment => "Formal Employment",
            Indicator::GenderEquality => "Gender Equality",
            Indicator::InternetAccess => "Internet Access",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} label: {label:?}")]
pub struct ParseLabelError {
    kind: &'static str,
    label: String,
}

impl FromStr for Entity {
    type Err = ParseLabelError;

    /// Case-insensitive match against [`Entity::label`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Entity::ALL
            .into_iter()
            .find(|e| e.label().to_lowercase() == wanted)
            .ok_or_else(|| ParseLabelError {
                kind: "entity",
                label: s.to_string(),
            })
    }
}

impl FromStr for Indicator {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Indicator::ALL
            .into_iter()
            .find(|i| i.label().to_lowercase() == wanted)
            .ok_or_else(|| ParseLabelError {
                kind: "indicator",
                label: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Record – one synthetic observation
// ---------------------------------------------------------------------------

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// One row of the dataset.
///
/// `compliance_pct` is always derived from the achieved and target values, so
/// the fields are private and only [`Record::new`] sets them. Deserialising
/// goes through the same constructor and ignores any serialised compliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordRow")]
pub struct Record {
    #[serde(rename = "Entity")]
    entity: Entity,
    #[serde(rename = "Indicator")]
    indicator: Indicator,
    #[serde(rename = "Target (%)")]
    target_pct: f64,
    #[serde(rename = "Achieved (%)")]
    achieved_pct: f64,
    #[serde(rename = "Compliance (%)")]
    compliance_pct: f64,
}

/// Column headers shared by every export format, in column order.
pub const COLUMN_HEADERS: [&str; 5] = [
    "Entity",
    "Indicator",
    "Target (%)",
    "Achieved (%)",
    "Compliance (%)",
];

impl Record {
    /// `target_pct` must be non-zero; the generator's range guarantees it.
    pub fn new(entity: Entity, indicator: Indicator, target_pct: f64, achieved_pct: f64) -> Self {
        Self {
            entity,
            indicator,
            target_pct,
            achieved_pct,
            compliance_pct: round2(achieved_pct / target_pct * 100.0),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn target_pct(&self) -> f64 {
        self.target_pct
    }

    pub fn achieved_pct(&self) -> f64 {
        self.achieved_pct
    }

    pub fn compliance_pct(&self) -> f64 {
        self.compliance_pct
    }
}

/// Wire shape of a record. Unknown columns, compliance included, are ignored.
#[derive(Deserialize)]
struct RecordRow {
    #[serde(rename = "Entity")]
    entity: Entity,
    #[serde(rename = "Indicator")]
    indicator: Indicator,
    #[serde(rename = "Target (%)")]
    target_pct: f64,
    #[serde(rename = "Achieved (%)")]
    achieved_pct: f64,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Record::new(row.entity, row.indicator, row.target_pct, row.achieved_pct)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete generated record set
// ---------------------------------------------------------------------------

/// Immutable record set. Built once, then only read and filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliance_is_derived_and_rounded() {
        let r = Record::new(Entity::Jalisco, Indicator::HousingAccess, 80.0, 90.0);
        assert_eq!(r.compliance_pct(), 112.5);

        let r = Record::new(Entity::Cdmx, Indicator::BasicEducation, 73.33, 61.07);
        assert_eq!(r.compliance_pct(), round2(61.07 / 73.33 * 100.0));
        assert_eq!(r.compliance_pct(), 83.28);
    }

    #[test]
    fn round2_keeps_exact_percentages() {
        assert_eq!(round2(105.0 / 100.0 * 100.0), 105.0);
        assert_eq!(round2(85.0 / 100.0 * 100.0), 85.0);
    }

    #[test]
    fn round2_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(83.2849), 83.28);
    }

    #[test]
    fn labels_parse_back_case_insensitively() {
        for e in Entity::ALL {
            assert_eq!(e.to_string().parse::<Entity>(), Ok(e));
        }
        for i in Indicator::ALL {
            assert_eq!(i.label().to_uppercase().parse::<Indicator>(), Ok(i));
        }
        assert_eq!("nuevo león".parse::<Entity>(), Ok(Entity::NuevoLeon));
        assert!("Atlantis".parse::<Entity>().is_err());
        assert!("".parse::<Indicator>().is_err());
    }

    #[test]
    fn dataset_accessors() {
        let ds = Dataset::from_records(vec![Record::new(
            Entity::Puebla,
            Indicator::GenderEquality,
            90.0,
            90.0,
        )]);
        assert_eq!(ds.len(), 1);
        assert!(!ds.is_empty());
        assert_eq!(ds.get(0).map(Record::compliance_pct), Some(100.0));
        assert!(ds.get(1).is_none());
        assert!(Dataset::from_records(Vec::new()).is_empty());
    }
}
