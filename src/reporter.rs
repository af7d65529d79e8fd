//! The reporter sink (spec.md §6). Reporter operations are asynchronous
//! from the controller's point of view: they must never block the
//! breeding phase, so implementations that touch the filesystem or a
//! console should be cheap or buffer internally.

use crate::genome::Genome;
use crate::persistence;
use std::path::PathBuf;

/// Sink the controller hands generation results to. Implementations never
/// see the population, only the per-generation summary.
pub trait Reporter: Send {
    /// Called once per generation after statistics are computed.
    fn tick(&mut self, generation: usize, best: f64, average: f64, best_genome: &[u8]);

    /// Called every `snapshot_interval` generations and on termination.
    fn save_best(&mut self, generation: usize, best_fitness: f64, genome: &Genome);

    /// A non-fatal error occurred (spec.md §7 "the reporter receives a
    /// log-level event"). Default implementation routes through `log`.
    fn log_event(&mut self, message: &str) {
        log::warn!("{message}");
    }

    /// Called exactly once, when the controller reaches `Terminated`
    /// (spec.md §4.7 "`evolution_summary.yaml`... written once on
    /// Terminated"). Default is a no-op for reporters that don't persist.
    fn finish(&mut self, _total_generations: usize, _peak_fitness: f64, _generation_of_peak: usize) {}
}

/// Silences reporting entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn tick(&mut self, _generation: usize, _best: f64, _average: f64, _best_genome: &[u8]) {}
    fn save_best(&mut self, _generation: usize, _best_fitness: f64, _genome: &Genome) {}
}

/// Prints one line per generation via `log::info!`, matching the
/// teacher's `Simple` strategy reporter texture (periodic one-liners).
#[derive(Clone, Debug)]
pub struct ConsoleReporter {
    pub period: usize,
}

impl ConsoleReporter {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Reporter for ConsoleReporter {
    fn tick(&mut self, generation: usize, best: f64, average: f64, _best_genome: &[u8]) {
        if self.period == 0 || generation % self.period == 0 {
            log::info!(
                "generation: {generation}, best: {best:.5}, average: {average:.5}"
            );
        }
    }

    fn save_best(&mut self, generation: usize, best_fitness: f64, _genome: &Genome) {
        log::info!("save_best - generation: {generation}, fitness: {best_fitness:.5}");
    }
}

/// The reporter that actually makes Persistence & Resume (spec.md §4.7)
/// reachable: writes `gen_NNNNN.bytes`/`.yaml` snapshots via
/// [`crate::persistence::save_best`] and, once on termination,
/// `evolution_summary.yaml` via [`crate::persistence::write_summary`].
/// Snapshot/summary failures are logged and swallowed, matching
/// `PersistenceError`'s non-fatal propagation policy (spec.md §7).
#[derive(Clone, Debug)]
pub struct FileReporter {
    pub dir: PathBuf,
    pub period: usize,
    last_average: f64,
}

impl FileReporter {
    pub fn new(dir: impl Into<PathBuf>, period: usize) -> Self {
        Self {
            dir: dir.into(),
            period,
            last_average: 0.0,
        }
    }
}

impl Reporter for FileReporter {
    fn tick(&mut self, generation: usize, best: f64, average: f64, _best_genome: &[u8]) {
        self.last_average = average;
        if self.period == 0 || generation % self.period == 0 {
            log::info!("generation: {generation}, best: {best:.5}, average: {average:.5}");
        }
    }

    fn save_best(&mut self, generation: usize, best_fitness: f64, genome: &Genome) {
        if let Err(err) = persistence::save_best(&self.dir, generation, best_fitness, self.last_average, genome) {
            log::warn!("failed to save generation {generation} snapshot: {err}");
        }
    }

    fn finish(&mut self, total_generations: usize, peak_fitness: f64, generation_of_peak: usize) {
        if let Err(err) = persistence::write_summary(&self.dir, total_generations, peak_fitness, generation_of_peak) {
            log::warn!("failed to write evolution summary: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_reporter_accepts_calls_without_panicking() {
        let mut reporter = NoopReporter;
        reporter.tick(0, 0.5, 0.4, &[1, 2, 3]);
        reporter.save_best(0, 0.5, &vec![1, 2, 3]);
        reporter.log_event("ignored");
    }

    struct TempDir(PathBuf);
    impl TempDir {
        fn new(label: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!(
                "byte_genome_ga-reporter-{label}-{:?}-{}",
                std::thread::current().id(),
                std::process::id()
            ));
            std::fs::create_dir_all(&path).unwrap();
            TempDir(path)
        }
    }
    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn file_reporter_writes_snapshot_and_summary() {
        let dir = TempDir::new("file-reporter");
        let mut reporter = FileReporter::new(dir.0.clone(), 1);

        reporter.tick(0, 0.8, 0.5, &[1, 2, 3]);
        reporter.save_best(0, 0.8, &vec![1, 2, 3]);
        assert!(dir.0.join("gen_00000.bytes").exists());
        assert!(dir.0.join("gen_00000.yaml").exists());

        reporter.finish(1, 0.8, 0);
        assert!(dir.0.join("evolution_summary.yaml").exists());
    }
}
