//! The genome is opaquely a byte sequence; domains supply the
//! interpretation. Genomes are never mutated in place -- operators always
//! yield fresh sequences (see [`crate::operators`]).

/// An immutable candidate solution: a byte sequence of domain-fixed length.
pub type Genome = Vec<u8>;

/// Identifies a genome's slot within the current generation's population.
/// Significant only within a single generation.
pub type GenomeId = usize;

/// Draws a fresh, uniformly random genome of the given length.
pub fn random_genome<R: rand::Rng + ?Sized>(rng: &mut R, length: usize) -> Genome {
    (0..length).map(|_| rng.gen()).collect()
}
