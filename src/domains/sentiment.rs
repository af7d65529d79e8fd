//! The sentiment domain: a [`crate::classifier`] genome scored against a
//! fixed set of `(text, label)` records. Turning raw text into lexicon
//! counts is the excluded external collaborator (spec.md §1 "Lexicon and
//! CSV dataset loaders... treated as a `produces a finite sequence of
//! (text, label) records`"); this module defines the extraction boundary
//! (`FeatureExtractor`) and ships one dependency-free implementation.

use crate::classifier::{classify, Class, FEATURE_COUNT};
use crate::domain::Domain;

/// Turns raw text into the 50-dimensional feature vector the classifier
/// votes over. Implementations are free to wrap an arbitrarily rich
/// lexicon; this crate only needs the interface.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, text: &str) -> [f64; FEATURE_COUNT];
}

/// A minimal bag-of-words extractor: feature 0/1/2 are positive/negative/
/// neutral word counts, features 3.. are per-word counts for a caller
/// supplied extra vocabulary (padded with zeros past the supplied words).
#[derive(Clone, Debug, Default)]
pub struct BagOfWordsFeatures {
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub neutral_words: Vec<String>,
    pub extra_words: Vec<String>,
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn count_matches(tokens: &[String], vocabulary: &[String]) -> f64 {
    tokens.iter().filter(|t| vocabulary.contains(t)).count() as f64
}

impl FeatureExtractor for BagOfWordsFeatures {
    fn extract(&self, text: &str) -> [f64; FEATURE_COUNT] {
        let tokens = tokenize(text);
        let mut features = [0.0; FEATURE_COUNT];
        features[0] = count_matches(&tokens, &self.positive_words);
        features[1] = count_matches(&tokens, &self.negative_words);
        features[2] = count_matches(&tokens, &self.neutral_words);
        for (i, word) in self.extra_words.iter().take(FEATURE_COUNT - 3).enumerate() {
            features[3 + i] = tokens.iter().filter(|t| *t == word).count() as f64;
        }
        features
    }
}

/// Genome size: 50 weight bytes (spec.md §4.6).
pub const GENOME_SIZE: usize = FEATURE_COUNT;

/// A `(text, label)` record, `label == 0` for Positive, `1` for Negative.
pub type Record = (String, u8);

pub struct SentimentDomain<F: FeatureExtractor> {
    records: Vec<Record>,
    extractor: F,
}

impl<F: FeatureExtractor> SentimentDomain<F> {
    pub fn new(records: Vec<Record>, extractor: F) -> Self {
        Self { records, extractor }
    }
}

impl<F: FeatureExtractor + 'static> Domain for SentimentDomain<F> {
    fn genome_size(&self) -> usize {
        GENOME_SIZE
    }

    fn evaluate(&self, genome: &[u8]) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let correct = self
            .records
            .iter()
            .filter(|(text, label)| {
                let features = self.extractor.extract(text);
                let (class, _, _) = classify(genome, &features);
                let predicted = match class {
                    Class::Positive => 0u8,
                    Class::Negative => 1u8,
                };
                predicted == *label
            })
            .count();
        correct as f64 / self.records.len() as f64
    }

    fn perfect_fitness(&self) -> f64 {
        0.98
    }

    fn display_result(&self, genome: &[u8]) -> String {
        format!("accuracy: {:.3}", self.evaluate(genome))
    }
}
