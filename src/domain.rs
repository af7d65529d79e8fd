//! The plug-in contract the core consumes (spec.md §6 "Domain contract").
//! Everything domain-specific -- arithmetic discovery, sentiment
//! classification -- lives behind this trait; the controller only ever
//! sees `Genome` bytes and `f64` scores.

use crate::genome::Genome;
use rand::Rng;

/// A problem domain: knows how to generate candidate genomes and how to
/// score them. Implementations must be safe to share read-only across
/// worker threads (`Sync`) once constructed.
pub trait Domain: Send + Sync {
    /// Length in bytes of every genome this domain produces or accepts.
    fn genome_size(&self) -> usize;

    /// Draws a fresh random genome of `genome_size()` bytes.
    fn random_genome(&self, rng: &mut dyn rand::RngCore) -> Genome {
        crate::genome::random_genome(rng, self.genome_size())
    }

    /// Scores a genome. Must return a finite value; implementations that
    /// might emit NaN or infinities should rely on [`clamp_fitness`] at the
    /// call site -- the worker pool clamps defensively regardless.
    fn evaluate(&self, genome: &[u8]) -> f64;

    /// The score at or above which a run is considered solved.
    fn perfect_fitness(&self) -> f64;

    /// Renders a genome for reporting purposes only; never parsed back.
    fn display_result(&self, genome: &[u8]) -> String {
        format!("{:?}", genome)
    }
}

/// Clamp rule shared by the worker pool and the controller: NaN is the
/// minimum score, and scores are clamped to `[0.0, 1.0]` (spec.md §3).
pub fn clamp_fitness(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Convenience helper so call sites don't need `dyn RngCore` plumbing when
/// they already hold a concrete `R: Rng`.
pub fn random_genome_with<D: Domain + ?Sized, R: Rng>(domain: &D, rng: &mut R) -> Genome {
    domain.random_genome(rng)
}
