//! The fitness worker pool (spec.md §4.5): bounded parallel evaluation
//! with round-robin dispatch and a single result channel the controller
//! drains as a countdown barrier. Workers hold only a shared read-only
//! `Arc<dyn Domain>`; they never coordinate with each other. Each worker
//! is a dedicated, long-lived OS thread, so its deterministic RNG lives in
//! a plain `std::thread_local!` rather than the `thread_local` crate's
//! `ThreadLocal<T>` (that type earns its keep when a pool abstracts the
//! physical thread away from you, e.g. under `rayon`; here the thread is
//! already explicit).

use crate::domain::{clamp_fitness, Domain};
use crate::genome::{Genome, GenomeId};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

struct WorkItem {
    generation: usize,
    genome_id: GenomeId,
    genome: Genome,
}

thread_local! {
    /// Per-worker-thread RNG, reseeded before every `domain.evaluate` call
    /// from `(generation, genome_id)` (spec.md §5: "each worker that needs
    /// randomness must be seeded deterministically... to preserve
    /// reproducibility"). `Domain::evaluate` itself takes no rng parameter
    /// (spec.md §6), so a domain whose fitness needs randomness reaches
    /// this via [`with_current_rng`] rather than a trait signature change.
    static CURRENT_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(0));
}

/// Runs `f` with mutable access to the calling worker thread's
/// deterministically-seeded RNG. Panics if called from outside a worker
/// thread (the thread-local is only ever reseeded there).
pub fn with_current_rng<T>(f: impl FnOnce(&mut SmallRng) -> T) -> T {
    CURRENT_RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// `evaluate(genome_id, genome) -> eventually (genome_id, score)`. Degenerate
/// `worker_count == 1` is a valid, synchronous-equivalent configuration
/// (spec.md §9 open question).
pub struct FitnessWorkerPool {
    senders: Vec<Sender<WorkItem>>,
    result_tx: Sender<(GenomeId, f64)>,
    result_rx: Receiver<(GenomeId, f64)>,
    next_worker: usize,
    handles: Vec<JoinHandle<()>>,
}

/// Deterministic per-(generation, genome_id) seed, so a worker re-seeding
/// its RNG for a given dispatch always reaches the same state regardless
/// of which physical thread handled it (spec.md §5).
fn deterministic_seed(generation: usize, genome_id: GenomeId) -> u64 {
    let mut h = generation as u64;
    h = h.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(genome_id as u64);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51AFD7ED558CCD);
    h ^= h >> 33;
    h
}

impl FitnessWorkerPool {
    /// Spawns `worker_count` threads, each holding a clone of `domain`. A
    /// worker that exceeds `timeout` (when set) yields score 0.0 instead
    /// of blocking the barrier indefinitely.
    pub fn new(domain: Arc<dyn Domain>, worker_count: usize, timeout: Option<Duration>) -> Self {
        assert!(worker_count >= 1);
        let (result_tx, result_rx) = mpsc::channel::<(GenomeId, f64)>();
        let mut senders = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);

        for _worker_id in 0..worker_count {
            let (tx, rx) = mpsc::channel::<WorkItem>();
            let result_tx = result_tx.clone();
            let domain = Arc::clone(&domain);
            let handle = std::thread::spawn(move || {
                while let Ok(item) = rx.recv() {
                    let seed = deterministic_seed(item.generation, item.genome_id);
                    CURRENT_RNG.with(|cell| *cell.borrow_mut() = SmallRng::seed_from_u64(seed));
                    let score = evaluate_with_timeout(domain.as_ref(), &item.genome, timeout);
                    // A worker failure never stalls the barrier: the
                    // channel send only fails if the controller has
                    // already dropped its receiver, which only happens
                    // after shutdown.
                    let _ = result_tx.send((item.genome_id, clamp_fitness(score)));
                }
            });
            senders.push(tx);
            handles.push(handle);
        }

        Self {
            senders,
            result_tx,
            result_rx,
            next_worker: 0,
            handles,
        }
    }

    /// Dispatches `(genome_id, genome)` to the next worker in round-robin
    /// order (spec.md §4.1 "Evaluation dispatch").
    pub fn dispatch(&mut self, generation: usize, genome_id: GenomeId, genome: Genome) {
        let worker = self.next_worker;
        self.next_worker = (self.next_worker + 1) % self.senders.len();
        // A closed worker channel means that worker thread panicked. The
        // caller's barrier waits on `recv()` until every dispatched genome
        // has a score, and the *other* workers' senders are still open, so
        // silently dropping this genome would hang the barrier forever --
        // deliver the worst-case score ourselves instead (spec.md §4.5/§7
        // "a worker failure does not stall the barrier").
        if self.senders[worker]
            .send(WorkItem {
                generation,
                genome_id,
                genome,
            })
            .is_err()
        {
            log::warn!("worker {worker} is gone, scoring genome {genome_id} as 0.0");
            let _ = self.result_tx.send((genome_id, 0.0));
        }
    }

    /// Blocks for the next `(genome_id, score)` result. The controller
    /// calls this exactly `population_size` times per generation.
    pub fn recv(&self) -> Option<(GenomeId, f64)> {
        self.result_rx.recv().ok()
    }

    pub fn worker_count(&self) -> usize {
        self.senders.len()
    }
}

impl Drop for FitnessWorkerPool {
    fn drop(&mut self) {
        self.senders.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn evaluate_with_timeout(domain: &dyn Domain, genome: &[u8], timeout: Option<Duration>) -> f64 {
    match timeout {
        None => domain.evaluate(genome),
        Some(budget) => {
            let start = Instant::now();
            let score = domain.evaluate(genome);
            if start.elapsed() > budget {
                log::warn!("fitness evaluation exceeded timeout, scoring 0.0");
                0.0
            } else {
                score
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ConstantDomain(f64);
    impl Domain for ConstantDomain {
        fn genome_size(&self) -> usize {
            4
        }
        fn evaluate(&self, _genome: &[u8]) -> f64 {
            self.0
        }
        fn perfect_fitness(&self) -> f64 {
            1.0
        }
    }

    #[test]
    fn round_trip_all_genomes_through_the_pool() {
        let domain: Arc<dyn Domain> = Arc::new(ConstantDomain(0.42));
        let mut pool = FitnessWorkerPool::new(domain, 3, None);
        for i in 0..10 {
            pool.dispatch(0, i, vec![0, 0, 0, 0]);
        }
        let mut seen = std::collections::HashSet::new();
        for _ in 0..10 {
            let (id, score) = pool.recv().unwrap();
            assert!((score - 0.42).abs() < 1e-9);
            seen.insert(id);
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn dispatch_delivers_zero_when_worker_channel_is_closed() {
        let domain: Arc<dyn Domain> = Arc::new(ConstantDomain(0.9));
        let mut pool = FitnessWorkerPool::new(domain, 1, None);
        // Simulate a worker that has already gone away (panicked mid-loop,
        // or simply exited): its receiving end is dropped, so sends to it
        // fail from here on.
        let (dead_tx, dead_rx) = mpsc::channel::<WorkItem>();
        drop(dead_rx);
        pool.senders[0] = dead_tx;

        pool.dispatch(0, 3, vec![0, 0, 0, 0]);
        let (id, score) = pool.recv().unwrap();
        assert_eq!(id, 3);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn nan_score_is_clamped_to_zero() {
        #[derive(Debug)]
        struct NanDomain;
        impl Domain for NanDomain {
            fn genome_size(&self) -> usize {
                1
            }
            fn evaluate(&self, _genome: &[u8]) -> f64 {
                f64::NAN
            }
            fn perfect_fitness(&self) -> f64 {
                1.0
            }
        }
        let domain: Arc<dyn Domain> = Arc::new(NanDomain);
        let mut pool = FitnessWorkerPool::new(domain, 1, None);
        pool.dispatch(0, 0, vec![0]);
        let (_id, score) = pool.recv().unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn current_rng_is_reseeded_identically_for_the_same_dispatch_key() {
        #[derive(Debug)]
        struct RngTappingDomain;
        impl Domain for RngTappingDomain {
            fn genome_size(&self) -> usize {
                1
            }
            fn evaluate(&self, _genome: &[u8]) -> f64 {
                use rand::Rng;
                with_current_rng(|rng| rng.gen::<u32>() as f64 / u32::MAX as f64)
            }
            fn perfect_fitness(&self) -> f64 {
                1.0
            }
        }
        let domain: Arc<dyn Domain> = Arc::new(RngTappingDomain);
        // Single worker: both dispatches for (generation=0, genome_id=5)
        // run on the same thread and must reseed to the same draw.
        let mut pool = FitnessWorkerPool::new(domain, 1, None);
        pool.dispatch(0, 5, vec![0]);
        let (_, first) = pool.recv().unwrap();
        pool.dispatch(0, 5, vec![0]);
        let (_, second) = pool.recv().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn deterministic_seed_is_stable() {
        assert_eq!(deterministic_seed(3, 7), deterministic_seed(3, 7));
        assert_ne!(deterministic_seed(3, 7), deterministic_seed(3, 8));
    }
}
