/// Analysis layer: statistics over a filtered view and the narrative built
/// from them.
///
/// ```text
///   FilteredView ──► aggregate ──► AggregateRow / SummaryStats
///                        │
///                        ▼
///                  observations ──► Assessment (band + callouts)
/// ```

pub mod aggregate;
pub mod observations;
