/// Data layer: core types, generation, and filtering.
///
/// Architecture:
/// ```text
///   GeneratorConfig (seed, size)
///        │
///        ▼
///   ┌───────────┐
///   │ generator │  seeded ChaCha8 draws → Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  entity ∧ indicator selection → FilteredView
///   └──────────┘
/// ```

pub mod generator;
pub mod model;
pub mod filter;
