//! The GA controller (spec.md §4.1): the evolution state machine. Owns the
//! population and fitness arrays exclusively; workers only ever see
//! read-only genome bytes. Drives generations through
//! `Init -> Evaluating -> Breeding -> Evaluating -> ... -> Terminated`.

use crate::config::GaConfig;
use crate::diversity::{self, BreedingPlan};
use crate::domain::{clamp_fitness, Domain};
use crate::error::ConfigurationError;
use crate::genome::{Genome, GenomeId};
use crate::operators::{tournament_select, GenomeOperators};
use crate::reporter::Reporter;
use crate::stats::{self, GenerationStats, Stagnation};
use crate::worker::FitnessWorkerPool;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TerminationReason {
    /// `best_score >= domain.perfect_fitness()`.
    Success,
    /// `generation_limit` was set and reached.
    GenerationLimit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GaState {
    Init,
    Evaluating,
    Breeding,
    Terminated(TerminationReason),
}

/// The evolution state machine. Generic over the domain and operator
/// family so the core stays reusable across arithmetic-discovery and
/// sentiment runs alike (spec.md §9 "Generic traits across domains").
pub struct GaController<D: Domain, O: GenomeOperators> {
    domain: Arc<D>,
    operators: O,
    config: GaConfig,
    rng: SmallRng,
    population: Vec<Genome>,
    fitness: Vec<Option<f64>>,
    pending: usize,
    generation: usize,
    stagnation: Stagnation,
    state: GaState,
    peak_fitness: f64,
    peak_generation: usize,
}

impl<D: Domain, O: GenomeOperators> GaController<D, O> {
    /// Builds the initial (or resumed) population. Fails only on invalid
    /// configuration (spec.md §4.1 "Fails only if configuration is
    /// invalid").
    pub fn new(
        domain: Arc<D>,
        operators: O,
        config: GaConfig,
        resume: Option<(usize, Genome)>,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let population_size = config.population_size;

        let (generation, population) = match resume {
            Some((starting_generation, seed_genome)) => {
                let population =
                    build_resume_population(&seed_genome, population_size, &operators, domain.as_ref(), &mut rng);
                (starting_generation, population)
            }
            None => {
                let population = (0..population_size)
                    .map(|_| domain.random_genome(&mut rng))
                    .collect();
                (0, population)
            }
        };

        Ok(Self {
            domain,
            operators,
            config,
            rng,
            fitness: vec![None; population_size],
            pending: population_size,
            generation,
            stagnation: Stagnation::new(),
            state: GaState::Init,
            peak_fitness: f64::MIN,
            peak_generation: 0,
            population,
        })
    }

    pub fn state(&self) -> GaState {
        self.state
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Dispatches every genome of the current generation to `pool` in
    /// round-robin order and transitions to `Evaluating`.
    pub fn dispatch_all(&mut self, pool: &mut FitnessWorkerPool) {
        self.fitness = vec![None; self.population.len()];
        self.pending = self.population.len();
        self.state = GaState::Evaluating;
        for (id, genome) in self.population.iter().cloned().enumerate() {
            pool.dispatch(self.generation, id, genome);
        }
    }

    /// Idempotent per `(generation, id)`: out-of-range ids and duplicate
    /// deliveries are discarded with a reported warning, never fatal
    /// (spec.md §4.1, §7 "ProtocolViolation").
    pub fn got_fitness(&mut self, reporter: &mut dyn Reporter, genome_id: GenomeId, score: f64) {
        if genome_id >= self.fitness.len() {
            reporter.log_event(&format!("discarding fitness for unknown genome id {genome_id}"));
            return;
        }
        if self.fitness[genome_id].is_some() {
            reporter.log_event(&format!("discarding duplicate fitness delivery for genome {genome_id}"));
            return;
        }
        self.fitness[genome_id] = Some(clamp_fitness(score));
        self.pending -= 1;
        if self.pending == 0 {
            self.state = GaState::Breeding;
        }
    }

    pub fn is_ready_to_breed(&self) -> bool {
        self.pending == 0
    }

    /// A worker thread that panics mid-evaluation closes its channel
    /// without ever sending a result. That must not stall the barrier
    /// (spec.md §4.5 "a worker failure does not stall the barrier"): any
    /// genome still missing a score once the result channel is exhausted
    /// is scored 0.0.
    fn fill_missing_as_zero(&mut self, reporter: &mut dyn Reporter) {
        for (id, slot) in self.fitness.iter_mut().enumerate() {
            if slot.is_none() {
                reporter.log_event(&format!("worker never returned a score for genome {id}, scoring 0.0"));
                *slot = Some(0.0);
                self.pending = self.pending.saturating_sub(1);
            }
        }
        if self.pending == 0 {
            self.state = GaState::Breeding;
        }
    }

    /// Statistics over the fully-collected fitness array (spec.md §4.1
    /// "Statistics"). Panics if called before the barrier releases --
    /// callers only invoke this once `is_ready_to_breed()`.
    pub fn compute_stats(&self) -> GenerationStats {
        let fitness: Vec<f64> = self
            .fitness
            .iter()
            .map(|f| f.expect("fitness barrier not yet complete"))
            .collect();
        stats::compute(self.generation, &fitness)
    }

    fn perfect_fitness(&self) -> f64 {
        self.config.perfect_fitness(self.domain.perfect_fitness())
    }

    /// Termination predicate in spec order: perfect fitness, then
    /// generation limit.
    pub fn check_termination(&self, stats: &GenerationStats) -> Option<TerminationReason> {
        if stats.best_score >= self.perfect_fitness() && !self.config.ignore_perfect_fitness {
            return Some(TerminationReason::Success);
        }
        if let Some(limit) = self.config.generation_limit {
            if self.generation >= limit {
                return Some(TerminationReason::GenerationLimit);
            }
        }
        None
    }

    /// Builds the next generation from the current (fully evaluated) one,
    /// applying the stagnation update, the diversity policy, elitism, and
    /// the breeding loop (spec.md §4.1 Breeding, §4.2, §4.3).
    pub fn breed(&mut self, stats: &GenerationStats) {
        self.stagnation.update(stats.best_score);
        let plan = diversity::decide(self.stagnation.stagnant_gens, &self.config);
        let fitness: Vec<f64> = self.fitness.iter().map(|f| f.unwrap()).collect();

        let mut next = Vec::with_capacity(self.population.len());
        // The absolute best always leads the next generation, verbatim.
        next.push(self.population[stats.best_index].clone());

        let mut elite_indices: Vec<usize> = (0..self.population.len())
            .filter(|&i| i != stats.best_index)
            .collect();
        elite_indices.sort_by(|&a, &b| fitness[b].partial_cmp(&fitness[a]).unwrap());
        for &idx in elite_indices.iter().take(plan.elitism_count.saturating_sub(1)) {
            next.push(self.population[idx].clone());
        }

        for _ in 0..plan.fresh_injection_count {
            if next.len() >= self.population.len() {
                break;
            }
            next.push(self.domain.random_genome(&mut self.rng));
        }

        while next.len() < self.population.len() {
            if self.rng.gen_bool_checked(plan.random_injection_rate) {
                next.push(self.domain.random_genome(&mut self.rng));
                continue;
            }
            let a = tournament_select(&mut self.rng, &fitness, self.config.tournament_size);
            let b = tournament_select(&mut self.rng, &fitness, self.config.tournament_size);
            let (c1, c2) = self
                .operators
                .crossover(&mut self.rng, &self.population[a], &self.population[b]);
            for child in [c1, c2] {
                if next.len() >= self.population.len() {
                    break;
                }
                let mutated = if self.rng.gen_bool_checked(plan.heavy_mutation_rate) {
                    self.operators.heavy_mutate(&mut self.rng, &child)
                } else {
                    self.operators.mutate(&mut self.rng, &child)
                };
                next.push(mutated);
            }
        }
        next.truncate(self.population.len());

        self.population = next;
        self.generation += 1;
        self.state = GaState::Init;
    }

    pub fn terminate(&mut self, reason: TerminationReason) {
        self.state = GaState::Terminated(reason);
    }

    /// Runs the full evolve loop to termination, driving `pool` and
    /// `reporter`. This is the high-level entry point; `dispatch_all` /
    /// `got_fitness` / `breed` remain available for callers that want to
    /// drive the state machine by hand (e.g. property tests).
    pub fn run(
        &mut self,
        pool: &mut FitnessWorkerPool,
        reporter: &mut dyn Reporter,
    ) -> (TerminationReason, GenerationStats) {
        loop {
            self.dispatch_all(pool);
            while !self.is_ready_to_breed() {
                match pool.recv() {
                    Some((id, score)) => self.got_fitness(reporter, id, score),
                    None => break,
                }
            }
            if !self.is_ready_to_breed() {
                self.fill_missing_as_zero(reporter);
            }
            let stats = self.compute_stats();
            reporter.tick(
                self.generation,
                stats.best_score,
                stats.avg_score,
                &self.population[stats.best_index],
            );
            if stats.best_score > self.peak_fitness {
                self.peak_fitness = stats.best_score;
                self.peak_generation = self.generation;
            }

            let reason = self.check_termination(&stats);
            let is_snapshot_due = self.config.snapshot_interval != 0
                && self.generation % self.config.snapshot_interval == 0;
            if is_snapshot_due || reason.is_some() {
                reporter.save_best(self.generation, stats.best_score, &self.population[stats.best_index]);
            }

            if let Some(reason) = reason {
                self.terminate(reason);
                reporter.finish(self.generation + 1, self.peak_fitness, self.peak_generation);
                return (reason, stats);
            }
            self.breed(&stats);
        }
    }
}

/// Rule-of-six resume seeding (spec.md §4.7): index 0 is the seed
/// verbatim; of the remaining `P-1` slots, ~1/6 are fully random, 1/6 are
/// heavy-mutated copies of the seed, and 4/6 are lightly-mutated copies.
fn build_resume_population<D: Domain + ?Sized, O: GenomeOperators>(
    seed_genome: &[u8],
    population_size: usize,
    operators: &O,
    domain: &D,
    rng: &mut SmallRng,
) -> Vec<Genome> {
    let mut population = Vec::with_capacity(population_size);
    population.push(seed_genome.to_vec());
    for i in 0..population_size.saturating_sub(1) {
        let slot = i % 6;
        let genome = match slot {
            0 => domain.random_genome(rng),
            1 => operators.heavy_mutate(rng, seed_genome),
            _ => operators.mutate(rng, seed_genome),
        };
        population.push(genome);
    }
    population
}

/// Small extension so breeding probability draws read like the rest of the
/// spec's "with probability p" language.
trait GenBoolChecked {
    fn gen_bool_checked(&mut self, p: f64) -> bool;
}
impl GenBoolChecked for SmallRng {
    fn gen_bool_checked(&mut self, p: f64) -> bool {
        use rand::Rng;
        self.gen_bool(p.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::byte::ByteOperators;
    use crate::reporter::{FileReporter, NoopReporter};

    #[derive(Debug)]
    struct CountOnesDomain;
    impl Domain for CountOnesDomain {
        fn genome_size(&self) -> usize {
            16
        }
        fn evaluate(&self, genome: &[u8]) -> f64 {
            genome.iter().map(|b| b.count_ones() as f64).sum::<f64>() / (genome.len() as f64 * 8.0)
        }
        fn perfect_fitness(&self) -> f64 {
            0.999
        }
    }

    fn config() -> GaConfig {
        GaConfig {
            population_size: 12,
            tournament_size: 3,
            elitism_count: 2,
            worker_count: 1,
            generation_limit: Some(5),
            snapshot_interval: 0,
            ..Default::default()
        }
    }

    #[test]
    fn population_size_preserved_across_breeding() {
        let domain = Arc::new(CountOnesDomain);
        let mut controller =
            GaController::new(domain, ByteOperators, config(), None, 1).unwrap();
        let mut reporter = NoopReporter;
        let fitness: Vec<f64> = controller.population().iter().map(|g| controller_eval(&controller, g)).collect();
        for (i, score) in fitness.into_iter().enumerate() {
            controller.got_fitness(&mut reporter, i, score);
        }
        assert!(controller.is_ready_to_breed());
        let stats = controller.compute_stats();
        let before_best = controller.population()[stats.best_index].clone();
        controller.breed(&stats);
        assert_eq!(controller.population().len(), 12);
        assert_eq!(controller.population()[0], before_best);
    }

    fn controller_eval(controller: &GaController<CountOnesDomain, ByteOperators>, genome: &[u8]) -> f64 {
        controller.domain.evaluate(genome)
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let domain = Arc::new(CountOnesDomain);
        let bad_config = GaConfig {
            population_size: 1,
            ..config()
        };
        let result = GaController::new(domain, ByteOperators, bad_config, None, 1);
        assert!(result.is_err());
    }

    #[test]
    fn resume_seeds_index_zero_verbatim() {
        let domain = Arc::new(CountOnesDomain);
        let seed_genome = vec![0xFFu8; 16];
        let controller = GaController::new(
            domain,
            ByteOperators,
            config(),
            Some((42, seed_genome.clone())),
            1,
        )
        .unwrap();
        assert_eq!(controller.generation(), 42);
        assert_eq!(controller.population()[0], seed_genome);
        assert_eq!(controller.population().len(), 12);
    }

    #[test]
    fn run_with_a_file_reporter_writes_snapshots_and_a_summary() {
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "byte_genome_ga-controller-run-{:?}-{}",
            std::thread::current().id(),
            std::process::id()
        ));
        let domain: Arc<CountOnesDomain> = Arc::new(CountOnesDomain);
        let mut controller = GaController::new(
            domain.clone(),
            ByteOperators,
            GaConfig {
                snapshot_interval: 2,
                ..config()
            },
            None,
            1,
        )
        .unwrap();
        let mut pool = FitnessWorkerPool::new(domain, 1, None);
        let mut reporter = FileReporter::new(dir.clone(), 0);

        controller.run(&mut pool, &mut reporter);

        assert!(dir.join("evolution_summary.yaml").exists());
        let any_snapshot = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().ends_with(".bytes"));
        assert!(any_snapshot);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
