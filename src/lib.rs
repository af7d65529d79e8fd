//! A parallel generational genetic algorithm engine for fixed-size byte
//! genomes, with an adaptive diversity controller, a clamped byte-code
//! virtual machine for arithmetic-discovery domains, and a weighted
//! feature classifier for the sentiment domain.
//!
//! There are four main elements:
//! * The [`genome`] -- an opaque, fixed-length byte sequence.
//! * The [`domain::Domain`] trait -- the search goal (fitness + genome
//!   shape), implemented by [`domains::fibonacci`], [`domains::powers_of_two`],
//!   and [`domains::sentiment`].
//! * The [`operators`] family a domain selects -- mutation/crossover.
//! * The [`controller::GaController`] -- the evolution state machine that
//!   drives generations through a [`worker::FitnessWorkerPool`] barrier.
//!
//! ## Quick usage
//!
//! ```rust
//! use byte_genome_ga::config::GaConfig;
//! use byte_genome_ga::controller::GaController;
//! use byte_genome_ga::domains::powers_of_two::PowersOfTwoDomain;
//! use byte_genome_ga::operators::vm_aware::VmAwareOperators;
//! use byte_genome_ga::reporter::NoopReporter;
//! use byte_genome_ga::vm::InstructionSet;
//! use byte_genome_ga::worker::FitnessWorkerPool;
//! use std::sync::Arc;
//!
//! let domain = Arc::new(PowersOfTwoDomain);
//! let operators = VmAwareOperators::new(InstructionSet::PowersOfTwo);
//! let config = GaConfig {
//!     population_size: 20,
//!     generation_limit: Some(3),
//!     worker_count: 2,
//!     ..Default::default()
//! };
//! let mut controller =
//!     GaController::new(domain.clone(), operators, config, None, 7).unwrap();
//! let mut pool = FitnessWorkerPool::new(domain, 2, None);
//! let mut reporter = NoopReporter;
//! let (_reason, _stats) = controller.run(&mut pool, &mut reporter);
//! ```

pub mod classifier;
pub mod config;
pub mod controller;
pub mod diversity;
pub mod domain;
pub mod domains;
pub mod error;
pub mod genome;
pub mod operators;
pub mod persistence;
pub mod reporter;
pub mod stats;
pub mod vm;
pub mod worker;
