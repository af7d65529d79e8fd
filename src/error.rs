//! Error kinds surfaced by the engine. Per the propagation policy: only
//! startup configuration problems are fatal. Everything else (a failing
//! fitness call, an out-of-range genome id, a VM that hits its step limit)
//! degrades to a worst-case value and is logged, never returned as `Err`.

use thiserror::Error;

/// Fatal at startup: an invalid combination of [`crate::config::GaConfig`]
/// fields. Detected once, before the first generation is dispatched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("population_size must be >= 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("tournament_size must be >= 2 and <= population_size ({1}), got {0}")]
    InvalidTournamentSize(usize, usize),
    #[error("elitism_count must be in [1, population_size - 1] ({1}), got {0}")]
    InvalidElitismCount(usize, usize),
    #[error("worker_count must be >= 1, got {0}")]
    InvalidWorkerCount(usize),
    #[error("mutation_rate must be in [0, 1], got {0}")]
    InvalidMutationRate(f64),
    #[error("crossover_rate must be in [0, 1], got {0}")]
    InvalidCrossoverRate(f64),
}

/// Non-fatal: reading or writing a generation snapshot failed. Saving logs
/// and continues the run; loading is treated as "no prior state found".
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
