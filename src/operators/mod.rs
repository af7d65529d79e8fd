//! Genome operator families (spec.md §4.3). Every family shares the same
//! contract -- pure functions over `(rng, inputs)` returning new byte
//! sequences of identical length -- so the controller is generic over
//! whichever family a domain chooses.

pub mod byte;
pub mod neural;
pub mod vm_aware;
pub mod weighted;

use crate::genome::Genome;
use rand::Rng;

/// The operator contract consumed by the controller and breeding loop.
pub trait GenomeOperators: Send + Sync {
    fn mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome;
    fn heavy_mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome;
    fn crossover(&self, rng: &mut dyn rand::RngCore, a: &[u8], b: &[u8]) -> (Genome, Genome);
}

/// Samples `k` indices uniformly with replacement from `[0, population_len)`
/// and returns the index of the fittest, lowest-index tie-break
/// (spec.md §4.3 "Tournament selection").
pub fn tournament_select<R: Rng>(rng: &mut R, fitness: &[f64], k: usize) -> usize {
    assert!(!fitness.is_empty());
    let mut winner: usize = rng.gen_range(0..fitness.len());
    for _ in 1..k {
        let sample = rng.gen_range(0..fitness.len());
        let better = fitness[sample] > fitness[winner]
            || (fitness[sample] == fitness[winner] && sample < winner);
        if better {
            winner = sample;
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn tournament_picks_the_best_sampled() {
        let mut rng = SmallRng::seed_from_u64(42);
        let fitness = vec![0.1, 0.9, 0.2, 0.95, 0.0];
        // k=50 with-replacement draws from 5 candidates makes the chance
        // of never sampling the true best (index 3) astronomically small.
        let winner = tournament_select(&mut rng, &fitness, 50);
        assert_eq!(winner, 3);
    }

    #[test]
    fn tournament_ties_pick_lowest_index() {
        let mut rng = SmallRng::seed_from_u64(1);
        let fitness = vec![0.5, 0.5, 0.5];
        let winner = tournament_select(&mut rng, &fitness, fitness.len());
        assert_eq!(winner, 0);
    }
}
