//! The adaptive diversity policy (spec.md §4.2): a pure function from
//! `(stagnant_gens, best_score, config)` to a breeding decision. Raises
//! random-injection and heavy-mutation rates as stagnation grows, and
//! collapses elitism to 1 once the run is truly stuck.

use crate::config::GaConfig;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StagnationTier {
    Normal,
    VeryStagnant,
    ExtremelyStagnant,
    UltraStagnant,
}

impl StagnationTier {
    pub fn classify(stagnant_gens: usize) -> StagnationTier {
        match stagnant_gens {
            0..=100 => StagnationTier::Normal,
            101..=500 => StagnationTier::VeryStagnant,
            501..=1000 => StagnationTier::ExtremelyStagnant,
            _ => StagnationTier::UltraStagnant,
        }
    }
}

/// Parameterizes the breeding loop for one generation.
#[derive(Clone, Copy, Debug)]
pub struct BreedingPlan {
    pub tier: StagnationTier,
    pub elitism_count: usize,
    pub random_injection_rate: f64,
    pub heavy_mutation_rate: f64,
    /// Ultra tier only: replace the first `population_size / 4` non-elite
    /// slots with fresh random genomes before the normal breeding loop.
    pub fresh_injection_count: usize,
}

/// Classifies `stagnant_gens` into a tier and returns the tier's breeding
/// parameters (spec.md §4.2 table).
pub fn decide(stagnant_gens: usize, config: &GaConfig) -> BreedingPlan {
    let tier = StagnationTier::classify(stagnant_gens);
    let (elitism_count, random_injection_rate, heavy_mutation_rate) = match tier {
        StagnationTier::Normal => (config.elitism_count, 1.0 / 20.0, 1.0 / 10.0),
        StagnationTier::VeryStagnant => (config.elitism_count, 1.0 / 5.0, 4.0 / 10.0),
        StagnationTier::ExtremelyStagnant => (config.elitism_count, 1.0 / 3.0, 7.0 / 10.0),
        StagnationTier::UltraStagnant => (1, 1.0 / 2.0, 8.0 / 10.0),
    };
    let fresh_injection_count = if tier == StagnationTier::UltraStagnant {
        config.population_size / 4
    } else {
        0
    };
    BreedingPlan {
        tier,
        elitism_count,
        random_injection_rate,
        heavy_mutation_rate,
        fresh_injection_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GaConfig {
        GaConfig {
            population_size: 100,
            elitism_count: 3,
            ..Default::default()
        }
    }

    #[test]
    fn boundary_at_100_is_normal() {
        assert_eq!(StagnationTier::classify(100), StagnationTier::Normal);
        assert_eq!(StagnationTier::classify(101), StagnationTier::VeryStagnant);
    }

    #[test]
    fn boundary_at_500_and_1000() {
        assert_eq!(StagnationTier::classify(500), StagnationTier::VeryStagnant);
        assert_eq!(
            StagnationTier::classify(501),
            StagnationTier::ExtremelyStagnant
        );
        assert_eq!(
            StagnationTier::classify(1000),
            StagnationTier::ExtremelyStagnant
        );
        assert_eq!(StagnationTier::classify(1001), StagnationTier::UltraStagnant);
    }

    #[test]
    fn ultra_stagnant_collapses_elitism_and_injects_fresh() {
        let plan = decide(1001, &config());
        assert_eq!(plan.tier, StagnationTier::UltraStagnant);
        assert_eq!(plan.elitism_count, 1);
        assert_eq!(plan.fresh_injection_count, 25);
        assert!((plan.random_injection_rate - 0.5).abs() < 1e-9);
        assert!((plan.heavy_mutation_rate - 0.8).abs() < 1e-9);
    }

    #[test]
    fn normal_tier_keeps_configured_elitism() {
        let plan = decide(0, &config());
        assert_eq!(plan.elitism_count, 3);
        assert_eq!(plan.fresh_injection_count, 0);
    }
}
