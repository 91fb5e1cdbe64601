use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::model::{round2, Dataset, Entity, Indicator, Record};

/// Programmed target range, percent.
pub const TARGET_RANGE: std::ops::Range<f64> = 70.0..100.0;
/// Achieved value range, percent.
pub const ACHIEVED_RANGE: std::ops::Range<f64> = 60.0..105.0;

// ---------------------------------------------------------------------------
// Generator settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { seed: 42, size: 50 }
    }
}

// ---------------------------------------------------------------------------
// Synthetic dataset
// ---------------------------------------------------------------------------

/// Build the synthetic dataset. The same config always yields the same records
/// in the same order.
pub fn generate(config: &GeneratorConfig) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let records: Vec<Record> = (0..config.size)
        .map(|_| random_record(&mut rng))
        .collect();

    log::debug!(
        "generated {} records from seed {}",
        records.len(),
        config.seed
    );
    Dataset::from_records(records)
}

fn random_record(rng: &mut ChaCha8Rng) -> Record {
    let entity = Entity::ALL[rng.gen_range(0..Entity::ALL.len())];
    let indicator = Indicator::ALL[rng.gen_range(0..Indicator::ALL.len())];
    let target = round2(rng.gen_range(TARGET_RANGE));
    let achieved = round2(rng.gen_range(ACHIEVED_RANGE));
    Record::new(entity, indicator, target, achieved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_dataset() {
        let config = GeneratorConfig::default();
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn different_seed_differs() {
        let a = generate(&GeneratorConfig { seed: 1, size: 50 });
        let b = generate(&GeneratorConfig { seed: 2, size: 50 });
        assert_ne!(a, b);
    }

    #[test]
    fn default_size_and_ranges() {
        let ds = generate(&GeneratorConfig::default());
        assert_eq!(ds.len(), 50);
        for r in ds.records() {
            assert!((70.0..=100.0).contains(&r.target_pct()), "{r:?}");
            assert!((60.0..=105.0).contains(&r.achieved_pct()), "{r:?}");
            assert_eq!(r.target_pct(), round2(r.target_pct()));
            assert_eq!(r.achieved_pct(), round2(r.achieved_pct()));
            assert_eq!(
                r.compliance_pct(),
                round2(r.achieved_pct() / r.target_pct() * 100.0)
            );
        }
    }

    #[test]
    fn zero_size_is_empty() {
        let ds = generate(&GeneratorConfig { seed: 42, size: 0 });
        assert!(ds.is_empty());
    }

    proptest! {
        #[test]
        fn compliance_matches_inputs_for_any_seed(seed in any::<u64>()) {
            let ds = generate(&GeneratorConfig { seed, size: 50 });
            prop_assert_eq!(ds.len(), 50);
            for r in ds.records() {
                prop_assert_eq!(
                    r.compliance_pct(),
                    round2(r.achieved_pct() / r.target_pct() * 100.0)
                );
            }
        }
    }
}
