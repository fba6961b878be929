//! Training-set assembly: bulk instance generation and persistence.
//!
//! A training set is two order-aligned sequences — graphs and the scores
//! (e.g. time-to-solution) some solver assigned them — plus a creation
//! stamp. Generation is embarrassingly parallel: every instance gets its
//! own seeded RNG, so a fixed config reproduces the same dataset
//! regardless of worker scheduling.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use crate::builder::{ChimeraBuilder, InstanceSpec};
use crate::model::Graph;
use crate::samplers::{PowerLaw, SpinGlassWeights};
use crate::{Error, Result};

// ============================================================================
// TrainingSet
// ============================================================================

/// Aligned (graph, score) pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSet {
    pub graphs: Vec<Graph>,
    pub scores: Vec<f64>,
    pub created_at: DateTime<Utc>,
}

impl TrainingSet {
    pub fn new(graphs: Vec<Graph>, scores: Vec<f64>) -> Result<Self> {
        if graphs.len() != scores.len() {
            return Err(Error::Dataset(format!(
                "{} graphs but {} scores",
                graphs.len(),
                scores.len()
            )));
        }
        Ok(Self {
            graphs,
            scores,
            created_at: Utc::now(),
        })
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Graph, f64)> + '_ {
        self.graphs.iter().zip(self.scores.iter().copied())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    /// Load and re-check the alignment invariant — a hand-edited file with
    /// mismatched sequences is rejected here, not deep inside training.
    pub fn load(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let set: TrainingSet = serde_json::from_reader(file)?;
        if set.graphs.len() != set.scores.len() {
            return Err(Error::Dataset(format!(
                "{} graphs but {} scores in {}",
                set.graphs.len(),
                set.scores.len(),
                path.display()
            )));
        }
        Ok(set)
    }
}

// ============================================================================
// Bulk generation
// ============================================================================

/// Parameters for one dataset sweep: every block shape up to
/// `max_rows`×`max_columns`, `samples_per_shape` instances each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub samples_per_shape: usize,
    pub max_rows: usize,
    pub max_columns: usize,
    /// Exponent of the power-law draw for each instance's on-rate; large
    /// values skew toward densely coupled instances.
    pub on_rate_exponent: f64,
    pub seed: u64,
    pub max_attempts: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            samples_per_shape: 1000,
            max_rows: 1,
            max_columns: 1,
            on_rate_exponent: 17.0,
            seed: 0,
            max_attempts: 1000,
        }
    }
}

/// Generate connected instances for every shape in the sweep, in parallel.
///
/// Instance `i` draws from `ChaCha8Rng::seed_from_u64(seed + i)`, so
/// results are stable under any rayon scheduling and any worker count.
pub fn generate_graphs(config: &GenerationConfig) -> Result<Vec<Graph>> {
    let on_rates = PowerLaw::new(config.on_rate_exponent)?;
    // Validates the whole sweep's bounds up front.
    InstanceSpec::new(config.max_rows, config.max_columns)?;

    let mut shapes = Vec::new();
    for rows in 1..=config.max_rows {
        for columns in 1..=config.max_columns {
            shapes.push((rows, columns));
        }
    }

    let total = shapes.len() * config.samples_per_shape;
    info!(total, shapes = shapes.len(), "generating chimera instances");

    let graphs = (0..total)
        .into_par_iter()
        .map(|i| {
            let (rows, columns) = shapes[i / config.samples_per_shape];
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
            let on_rate = on_rates.sample(&mut rng);

            let spec = InstanceSpec::new(rows, columns)?.with_on_rate(on_rate)?;
            ChimeraBuilder::with_rng(rng)
                .max_attempts(config.max_attempts)
                .create_graph(&spec, &SpinGlassWeights, &SpinGlassWeights)
        })
        .collect::<Result<Vec<Graph>>>()?;

    Ok(graphs)
}
