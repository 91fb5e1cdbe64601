//! Performance-indicator compliance dashboard: synthetic data, filtering,
//! aggregation, narrative observations and CSV/XLSX export.
//!
//! The egui front end lives in the `pbr-dashboard` binary; the headless
//! `export_report` binary reuses the same pipeline.

pub mod analysis;
pub mod color;
pub mod data;
pub mod export;
pub mod report;
pub mod state;
