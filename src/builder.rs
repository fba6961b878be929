//! Randomized construction of Chimera problem instances.
//!
//! The builder owns its RNG; weight and bias samplers are injected per
//! call as `Distribution<f64>` values. Connectivity is guaranteed by
//! whole-graph resampling — a disconnected draw is discarded, never
//! patched — under a bounded attempt budget.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution;
use tracing::trace;

use crate::connectivity::is_fully_connected;
use crate::model::{
    Edge, Graph, GRID_COLUMNS, GRID_ROWS,
    HORIZONTAL_COUPLERS, INTERNAL_COUPLERS, VERTICAL_COUPLERS,
};
use crate::{Error, Result};

// ============================================================================
// InstanceSpec
// ============================================================================

/// Validated description of one instance draw: block shape, coupler
/// on-rate, and whether connectivity is required.
///
/// Validation happens here, at construction — by the time a spec reaches
/// the sampling loops every field is known good.
#[derive(Debug, Clone, Copy)]
pub struct InstanceSpec {
    rows: usize,
    columns: usize,
    on_rate: f64,
    connected: bool,
}

impl InstanceSpec {
    /// A `rows`×`columns` cell block. Both extents must lie in `1..=16`;
    /// empty or oversized blocks are rejected rather than silently
    /// producing a degenerate graph.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        let valid = 1..=GRID_ROWS as usize;
        if !valid.contains(&rows) || !(1..=GRID_COLUMNS as usize).contains(&columns) {
            return Err(Error::InvalidShape { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            on_rate: 0.5,
            connected: true,
        })
    }

    /// Probability that each gated coupler is switched on.
    pub fn with_on_rate(mut self, on_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&on_rate) {
            return Err(Error::Config(format!(
                "on-rate must lie in [0, 1], got {on_rate}"
            )));
        }
        self.on_rate = on_rate;
        Ok(self)
    }

    /// Skip the connectivity requirement (and its resampling loop).
    pub fn allow_disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn on_rate(&self) -> f64 {
        self.on_rate
    }

    pub fn connected(&self) -> bool {
        self.connected
    }
}

// ============================================================================
// ChimeraBuilder
// ============================================================================

/// Instance generator over an owned random source.
pub struct ChimeraBuilder<R: Rng> {
    rng: R,
    max_attempts: usize,
}

const DEFAULT_MAX_ATTEMPTS: usize = 1000;

impl ChimeraBuilder<ChaCha8Rng> {
    /// Deterministic builder — same seed, same spec, same instances.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl ChimeraBuilder<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for ChimeraBuilder<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ChimeraBuilder<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Attempt budget for the connectivity-resampling loop.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sample the coupler layer of a `spec.rows()`×`spec.columns()` block.
    ///
    /// Internal couplers are gated: kept with probability `on_rate`, else
    /// written as an explicit 0.0 "off" entry. Each cell then gets one
    /// forced horizontal and one forced vertical connector (ungated — a
    /// cell boundary with no potential connection would make replication
    /// unviable) before the remaining boundary couplers are gated in.
    /// Placement at the lattice edge follows [`Edge::place`]: couplers
    /// into the wrapped or out-of-range neighbour are skipped, dangling
    /// connectors into a real neighbouring cell survive.
    pub fn assign_edges(
        &mut self,
        spec: &InstanceSpec,
        weights: &impl Distribution<f64>,
    ) -> Graph {
        let mut graph = Graph::new();

        for row in 0..spec.rows() as u16 {
            for column in 0..spec.columns() as u16 {
                for template in INTERNAL_COUPLERS {
                    if let Some(edge) = Edge::place(template, row, column) {
                        let weight = self.gated_weight(spec.on_rate(), weights);
                        graph.insert(edge, weight);
                    }
                }

                let forced_h = HORIZONTAL_COUPLERS[self.rng.gen_range(0..4)];
                if let Some(edge) = Edge::place(forced_h, row, column) {
                    graph.insert(edge, weights.sample(&mut self.rng));
                }

                let forced_v = VERTICAL_COUPLERS[self.rng.gen_range(0..4)];
                if let Some(edge) = Edge::place(forced_v, row, column) {
                    graph.insert(edge, weights.sample(&mut self.rng));
                }

                for template in HORIZONTAL_COUPLERS.iter().chain(&VERTICAL_COUPLERS) {
                    if let Some(edge) = Edge::place(*template, row, column) {
                        if !graph.contains(edge) {
                            let weight = self.gated_weight(spec.on_rate(), weights);
                            graph.insert(edge, weight);
                        }
                    }
                }
            }
        }

        graph
    }

    /// Assign a bias to every qubit participating in the graph; existing
    /// bias entries are kept. Qubits are visited in sorted order so a
    /// seeded builder stays reproducible.
    pub fn assign_biases(
        &mut self,
        mut graph: Graph,
        biases: &impl Distribution<f64>,
    ) -> Graph {
        for qubit in graph.qubits() {
            let bias = Edge::bias(qubit);
            if !graph.contains(bias) {
                graph.insert(bias, biases.sample(&mut self.rng));
            }
        }
        graph
    }

    /// Full instance draw: couplers, connectivity retry, then biases.
    ///
    /// A disconnected draw discards the whole edge set and resamples from
    /// scratch. The loop is bounded by [`ChimeraBuilder::max_attempts`];
    /// a pathologically low on-rate surfaces [`Error::ConnectivityTimeout`]
    /// instead of spinning forever.
    pub fn create_graph(
        &mut self,
        spec: &InstanceSpec,
        edge_weights: &impl Distribution<f64>,
        bias_weights: &impl Distribution<f64>,
    ) -> Result<Graph> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }

        let mut graph = self.assign_edges(spec, edge_weights);

        if spec.connected() {
            let mut attempts = 1;
            while !is_fully_connected(&graph) {
                if attempts >= self.max_attempts {
                    return Err(Error::ConnectivityTimeout { attempts });
                }
                trace!(attempts, "instance disconnected, resampling");
                graph = self.assign_edges(spec, edge_weights);
                attempts += 1;
            }
        }

        Ok(self.assign_biases(graph, bias_weights))
    }

    fn gated_weight(&mut self, on_rate: f64, weights: &impl Distribution<f64>) -> f64 {
        if self.rng.gen_range(0.0..1.0) < on_rate {
            weights.sample(&mut self.rng)
        } else {
            0.0
        }
    }
}
