//! # chimera-rs — Chimera-Lattice Ising Instance Generator
//!
//! Randomized, connectivity-guaranteed problem instances on the Chimera
//! hardware graph (16×16 bipartite cells, 8 qubits each, 2048 qubits),
//! plus the canonical encodings used to feed them to annealing solvers
//! and to learned instance generators.
//!
//! ## Design Principles
//!
//! 1. **Pure model layer**: `Qubit`, `Edge`, `Graph` are plain data —
//!    no I/O, no randomness, no global state
//! 2. **One edge universe**: `EdgeIndexTable` is built once, immutable,
//!    and every vector encoding is keyed by its deterministic order
//! 3. **Samplers are injected**: weight and bias distributions are
//!    passed in as `rand_distr::Distribution<f64>` values, never baked in
//! 4. **Loud codec, lenient geometry**: an edge the table does not know
//!    is an error; an edge that a translation pushes off the lattice is
//!    silently dropped
//!
//! ## Quick Start
//!
//! ```rust
//! use chimera_rs::{ChimeraBuilder, EdgeIndexTable, InstanceSpec, SpinGlassWeights, codec};
//!
//! # fn example() -> chimera_rs::Result<()> {
//! let table = EdgeIndexTable::build();
//! let mut builder = ChimeraBuilder::seeded(7);
//!
//! // A connected 2×3-cell instance, ~40% of internal couplers active.
//! let spec = InstanceSpec::new(2, 3)?.with_on_rate(0.4)?;
//! let graph = builder.create_graph(&spec, &SpinGlassWeights, &SpinGlassWeights)?;
//!
//! // Fixed-length encoding for model training.
//! let vector = codec::to_vector(&graph, &table)?;
//! assert_eq!(vector.len(), table.len());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Solver Boundaries
//!
//! | Boundary | Module | Description |
//! |----------|--------|-------------|
//! | Instance text | `export` | `"<num_qubits> <num_entries>"` header + `n1 n2 w` lines |
//! | SAPI payload | `export` | JSON submission body for the cloud annealer |
//! | Subprocess | `anneal` | Runs an external annealer binary (feature `solver`) |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod index;
pub mod connectivity;
pub mod builder;
pub mod samplers;
pub mod codec;
pub mod export;
pub mod dataset;
#[cfg(feature = "solver")]
pub mod anneal;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Qubit, Edge, Graph,
    GRID_ROWS, GRID_COLUMNS, CELL_QUBITS, QUBIT_COUNT,
};

// ============================================================================
// Re-exports: Lattice index and connectivity
// ============================================================================

pub use index::{EdgeIndexTable, COUPLER_COUNT, BIAS_COUNT, EDGE_UNIVERSE};
pub use connectivity::{is_fully_connected, path_exists};

// ============================================================================
// Re-exports: Construction
// ============================================================================

pub use builder::{ChimeraBuilder, InstanceSpec};
pub use samplers::{PowerLaw, SpinGlassWeights};

// ============================================================================
// Re-exports: Datasets
// ============================================================================

pub use dataset::{GenerationConfig, TrainingSet};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edge or qubit outside the valid lattice domain reached a
    /// codec lookup. This is a builder-invariant violation, never a
    /// recoverable runtime case.
    #[error("edge ({0}, {1}) is not part of the chimera lattice")]
    InvalidEdge(u16, u16),

    /// The connectivity-resampling loop exhausted its attempt budget.
    #[error("no connected instance found after {attempts} attempts")]
    ConnectivityTimeout { attempts: usize },

    /// A cell block outside the 16×16 grid (or empty) was requested.
    #[error("invalid cell block: {rows} rows x {columns} columns")]
    InvalidShape { rows: usize, columns: usize },

    /// A parameter failed eager validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A feature vector of the wrong length was handed to the codec.
    #[error("vector has length {got}, expected {expected}")]
    VectorLength { got: usize, expected: usize },

    /// A persisted index table failed validation on load.
    #[error("index table rejected: {0}")]
    Table(String),

    /// The external annealer failed or produced unparseable output.
    #[error("solver error: {0}")]
    Solver(String),

    /// Malformed instance text handed to the parser.
    #[error("malformed instance text: {0}")]
    Instance(String),

    /// A training set violated its alignment invariant.
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
