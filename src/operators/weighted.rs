//! Weighted-classifier operators (spec.md §4.3), used by the sentiment
//! domain's 50-byte weight genome. Mutation adds Gaussian noise (Box-Muller)
//! rather than flipping bytes outright, which suits weights that are
//! meant to drift smoothly rather than jump.

use super::GenomeOperators;
use crate::genome::Genome;
use rand::Rng;
use std::f64::consts::PI;

#[derive(Clone, Debug, Default)]
pub struct WeightedOperators;

/// One standard-normal sample via Box-Muller, using two independent
/// uniform draws in `(0, 1]` to avoid the `ln(0)` singularity.
fn standard_normal(rng: &mut dyn rand::RngCore) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn gaussian_jitter(rng: &mut dyn rand::RngCore, byte: u8, sigma: f64) -> u8 {
    let noise = standard_normal(rng) * sigma;
    (byte as f64 + noise).round().clamp(0.0, 255.0) as u8
}

impl GenomeOperators for WeightedOperators {
    fn mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        genome.iter().map(|&b| gaussian_jitter(rng, b, 10.0)).collect()
    }

    fn heavy_mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out: Genome = genome.iter().map(|_| rng.gen()).collect();
        // Occasionally scramble a contiguous segment in place, on top of
        // the full byte randomization (spec.md: "byte randomization plus
        // occasional segment scramble").
        if rng.gen_bool(0.3) && out.len() >= 2 {
            let mut start = rng.gen_range(0..out.len());
            let mut end = rng.gen_range(0..out.len());
            if start > end {
                std::mem::swap(&mut start, &mut end);
            }
            let segment = &mut out[start..=end.min(out.len() - 1)];
            for i in (1..segment.len()).rev() {
                let j = rng.gen_range(0..=i);
                segment.swap(i, j);
            }
        }
        out
    }

    fn crossover(&self, _rng: &mut dyn rand::RngCore, a: &[u8], b: &[u8]) -> (Genome, Genome) {
        debug_assert_eq!(a.len(), b.len());
        let mid = a.len() / 2;
        let mut child1 = a[..mid].to_vec();
        child1.extend_from_slice(&b[mid..]);
        let mut child2 = b[..mid].to_vec();
        child2.extend_from_slice(&a[mid..]);
        (child1, child2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn mutate_preserves_length() {
        let mut rng = SmallRng::seed_from_u64(4);
        let genome = vec![128u8; 50];
        let out = WeightedOperators.mutate(&mut rng, &genome);
        assert_eq!(out.len(), 50);
    }

    #[test]
    fn crossover_splits_at_midpoint() {
        let mut rng = SmallRng::seed_from_u64(4);
        let a = vec![1u8; 50];
        let b = vec![2u8; 50];
        let (c1, _c2) = WeightedOperators.crossover(&mut rng, &a, &b);
        assert!(c1[..25].iter().all(|&v| v == 1));
        assert!(c1[25..].iter().all(|&v| v == 2));
    }
}
