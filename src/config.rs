//! Configuration recognized by the GA controller (spec.md §6).

use crate::error::ConfigurationError;
use std::time::Duration;

/// All the knobs the controller needs to run an evolution. Built directly
/// (no builder pattern here -- every field is required except the three
/// explicitly marked optional, and validation happens once in [`GaConfig::validate`]).
#[derive(Clone, Debug)]
pub struct GaConfig {
    pub population_size: usize,
    pub tournament_size: usize,
    pub worker_count: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_count: usize,
    pub generation_limit: Option<usize>,
    pub snapshot_interval: usize,
    pub perfect_fitness_override: Option<f64>,
    /// §9 open question: resume past `perfect_fitness` instead of
    /// terminating on the first generation that reaches it.
    pub ignore_perfect_fitness: bool,
    /// §5 "Timeouts (OPTIONAL)": a worker exceeding this yields score 0.0.
    pub fitness_timeout: Option<Duration>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            tournament_size: 5,
            worker_count: 4,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            elitism_count: 2,
            generation_limit: None,
            snapshot_interval: 25,
            perfect_fitness_override: None,
            ignore_perfect_fitness: false,
            fitness_timeout: None,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size < 2 {
            return Err(ConfigurationError::PopulationTooSmall(self.population_size));
        }
        if self.tournament_size < 2 || self.tournament_size > self.population_size {
            return Err(ConfigurationError::InvalidTournamentSize(
                self.tournament_size,
                self.population_size,
            ));
        }
        if self.elitism_count < 1 || self.elitism_count > self.population_size - 1 {
            return Err(ConfigurationError::InvalidElitismCount(
                self.elitism_count,
                self.population_size,
            ));
        }
        if self.worker_count < 1 {
            return Err(ConfigurationError::InvalidWorkerCount(self.worker_count));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigurationError::InvalidMutationRate(self.mutation_rate));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigurationError::InvalidCrossoverRate(self.crossover_rate));
        }
        Ok(())
    }

    pub fn perfect_fitness(&self, domain_default: f64) -> f64 {
        self.perfect_fitness_override.unwrap_or(domain_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_tiny_population() {
        let config = GaConfig {
            population_size: 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::PopulationTooSmall(1))
        );
    }

    #[test]
    fn rejects_elitism_at_population_size() {
        let config = GaConfig {
            population_size: 10,
            elitism_count: 10,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidElitismCount(10, 10))
        ));
    }

    #[test]
    fn rejects_tournament_below_two() {
        let config = GaConfig {
            tournament_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTournamentSize(1, _))
        ));
    }
}
