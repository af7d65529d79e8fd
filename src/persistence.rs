//! Generation snapshots and resume support (spec.md §4.7, §6). The
//! controller never touches the filesystem directly (spec.md §5 "the
//! filesystem directory for snapshots is written only by the reporter");
//! this module is the thin handle other layers funnel through.

use crate::error::PersistenceError;
use crate::genome::Genome;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Width of the zero-padded generation suffix, chosen so byte-wise
/// lexicographic file ordering matches numeric ordering up to 10^10 - 1
/// generations.
const SUFFIX_WIDTH: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FitnessMetrics {
    pub best: f64,
    pub average: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenomeMetrics {
    pub size: usize,
    pub file: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerationMetrics {
    pub generation: usize,
    pub fitness: FitnessMetrics,
    pub genome: GenomeMetrics,
}

fn stem(generation: usize) -> String {
    format!("gen_{:0width$}", generation, width = SUFFIX_WIDTH)
}

/// Writes `gen_NNNNN.bytes` (raw genome) and `gen_NNNNN.yaml` (metrics)
/// under `dir`. Non-fatal on failure: callers log and continue (spec.md §7
/// "PersistenceError... non-fatal when saving").
pub fn save_best(
    dir: &Path,
    generation: usize,
    best: f64,
    average: f64,
    genome: &[u8],
) -> Result<(), PersistenceError> {
    fs::create_dir_all(dir)?;
    let stem = stem(generation);
    let bytes_name = format!("{stem}.bytes");
    fs::write(dir.join(&bytes_name), genome)?;

    let metrics = GenerationMetrics {
        generation,
        fitness: FitnessMetrics { best, average },
        genome: GenomeMetrics {
            size: genome.len(),
            file: bytes_name,
        },
    };
    let yaml = serde_yaml::to_string(&metrics)?;
    fs::write(dir.join(format!("{stem}.yaml")), yaml)?;
    Ok(())
}

/// Scans `dir` for `gen_*.bytes` files and returns the one with the
/// maximum numeric suffix. A missing directory, or one with no matching
/// files, is treated as "no prior state" -- `(0, None)`.
pub fn find_latest_generation(dir: &Path) -> (usize, Option<Genome>) {
    if !dir.is_dir() {
        return (0, None);
    }
    let best = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let name = path.file_name()?.to_str()?.to_string();
            let number = name.strip_prefix("gen_")?.strip_suffix(".bytes")?.parse::<usize>().ok()?;
            Some((number, path))
        })
        .max_by_key(|(number, _)| *number);

    match best {
        Some((number, path)) => match fs::read(&path) {
            Ok(bytes) => (number, Some(bytes)),
            Err(err) => {
                log::warn!("failed to read latest snapshot {path:?}: {err}");
                (0, None)
            }
        },
        None => (0, None),
    }
}

/// Deletes every `gen_*.bytes` and `gen_*.yaml` file under `dir`, returning
/// the count removed.
pub fn clear_all(dir: &Path) -> usize {
    fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with("gen_") && (name.ends_with(".bytes") || name.ends_with(".yaml"))
        })
        .filter(|entry| fs::remove_file(entry.path()).is_ok())
        .count()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvolutionSummaryBody {
    pub total_generations: usize,
    pub peak_fitness_achieved: f64,
    pub generation_of_peak: usize,
    pub completion_timestamp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvolutionSummary {
    pub evolution_summary: EvolutionSummaryBody,
}

fn unix_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("unix:{secs}")
}

/// Writes `evolution_summary.yaml` once, on termination (spec.md §6).
pub fn write_summary(
    dir: &Path,
    total_generations: usize,
    peak_fitness_achieved: f64,
    generation_of_peak: usize,
) -> Result<(), PersistenceError> {
    fs::create_dir_all(dir)?;
    let summary = EvolutionSummary {
        evolution_summary: EvolutionSummaryBody {
            total_generations,
            peak_fitness_achieved,
            generation_of_peak,
            completion_timestamp: unix_timestamp(),
        },
    };
    let yaml = serde_yaml::to_string(&summary)?;
    fs::write(dir.join("evolution_summary.yaml"), yaml)?;
    Ok(())
}
