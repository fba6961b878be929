//! The canonical edge universe and its deterministic index.
//!
//! Every edge that can exist anywhere on the lattice — couplers and bias
//! self-pairs — is enumerated once, sorted by canonical pair order, and
//! assigned a stable index. The table is immutable after construction and
//! shared by reference; vector encodings are reproducible across runs and
//! across tooling precisely because this ordering is total and fixed.
//!
//! The reverse direction is an explicit `index → edge` array built
//! alongside the forward map, so decoding never has to reconstruct
//! ordering ad hoc.

use hashbrown::HashMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::model::{
    Edge, CELL_QUBITS, GRID_COLUMNS, GRID_ROWS,
    HORIZONTAL_COUPLERS, INTERNAL_COUPLERS, VERTICAL_COUPLERS,
};
use crate::{Error, Result};

/// Couplers on the full lattice: 16·256 internal + 4·16·15 horizontal
/// + 4·15·16 vertical.
pub const COUPLER_COUNT: usize = 6016;

/// One bias self-pair per qubit.
pub const BIAS_COUNT: usize = 2048;

/// Total indexable entries — the feature-vector length.
pub const EDGE_UNIVERSE: usize = COUPLER_COUNT + BIAS_COUNT;

/// Immutable bijection between lattice edges and `[0, EDGE_UNIVERSE)`.
#[derive(Debug, Clone)]
pub struct EdgeIndexTable {
    index_of: HashMap<Edge, u16>,
    edges: Vec<Edge>,
}

impl EdgeIndexTable {
    /// Enumerate the full lattice: every cell × every template, wrap and
    /// bounds rejection included. Pure function of the geometry.
    pub fn build() -> Self {
        let mut universe = BTreeSet::new();

        for row in 0..GRID_ROWS {
            for column in 0..GRID_COLUMNS {
                let couplers = INTERNAL_COUPLERS
                    .iter()
                    .chain(&HORIZONTAL_COUPLERS)
                    .chain(&VERTICAL_COUPLERS)
                    .copied();
                let biases = (0..CELL_QUBITS).map(|local| (local, local));

                for template in couplers.chain(biases) {
                    if let Some(edge) = Edge::place(template, row, column) {
                        universe.insert(edge);
                    }
                }
            }
        }

        let edges: Vec<Edge> = universe.into_iter().collect();

        let couplers = edges.iter().filter(|e| !e.is_bias()).count();
        let biases = edges.len() - couplers;
        assert_eq!(couplers, COUPLER_COUNT, "coupler universe drifted");
        assert_eq!(biases, BIAS_COUNT, "bias universe drifted");

        Self::from_edges(edges).expect("freshly built universe is valid")
    }

    /// Assemble the bidirectional map, validating the ordering invariants.
    fn from_edges(edges: Vec<Edge>) -> Result<Self> {
        if edges.len() != EDGE_UNIVERSE {
            return Err(Error::Table(format!(
                "{} entries, expected {EDGE_UNIVERSE}",
                edges.len()
            )));
        }

        for pair in edges.windows(2) {
            if pair[0] >= pair[1] {
                return Err(Error::Table(format!(
                    "entries out of canonical order at {} >= {}",
                    pair[0], pair[1]
                )));
            }
        }

        if let Some(edge) = edges.iter().find(|e| !e.in_bounds()) {
            return Err(Error::Table(format!("edge {edge} outside the lattice")));
        }

        let index_of = edges
            .iter()
            .enumerate()
            .map(|(i, e)| (*e, i as u16))
            .collect();

        Ok(Self { index_of, edges })
    }

    pub fn index_of(&self, edge: Edge) -> Option<usize> {
        self.index_of.get(&edge).map(|i| *i as usize)
    }

    pub fn edge_at(&self, index: usize) -> Option<Edge> {
        self.edges.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Edge)> + '_ {
        self.edges.iter().enumerate().map(|(i, e)| (i, *e))
    }

    /// Persist as the ordered edge list. The content *is* the ordering:
    /// previously encoded vectors stay valid only if this file round-trips
    /// unchanged.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, &self.edges)?;
        Ok(())
    }

    /// Load a persisted table, re-validating length, order, and bounds.
    pub fn load(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let edges: Vec<Edge> = serde_json::from_reader(file)?;
        Self::from_edges(edges)
    }
}

impl Default for EdgeIndexTable {
    fn default() -> Self {
        Self::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Qubit;

    #[test]
    fn test_universe_counts() {
        let table = EdgeIndexTable::build();
        assert_eq!(table.len(), EDGE_UNIVERSE);
        assert_eq!(table.iter().filter(|(_, e)| !e.is_bias()).count(), COUPLER_COUNT);
        assert_eq!(table.iter().filter(|(_, e)| e.is_bias()).count(), BIAS_COUNT);
    }

    #[test]
    fn test_bijection_is_contiguous() {
        let table = EdgeIndexTable::build();
        for (i, edge) in table.iter() {
            assert_eq!(table.index_of(edge), Some(i));
            assert_eq!(table.edge_at(i), Some(edge));
        }
        assert_eq!(table.edge_at(EDGE_UNIVERSE), None);
    }

    #[test]
    fn test_first_and_last_entries() {
        let table = EdgeIndexTable::build();
        // Sorted pair order: the (0,0) bias leads, the (2047,2047) bias closes.
        assert_eq!(table.edge_at(0), Some(Edge::bias(Qubit(0))));
        assert_eq!(
            table.edge_at(EDGE_UNIVERSE - 1),
            Some(Edge::bias(Qubit(2047)))
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge_indices.json");

        let table = EdgeIndexTable::build();
        table.save(&path).unwrap();
        let loaded = EdgeIndexTable::load(&path).unwrap();

        assert_eq!(loaded.len(), table.len());
        for (i, edge) in table.iter() {
            assert_eq!(loaded.edge_at(i), Some(edge));
        }
    }

    #[test]
    fn test_load_rejects_truncated_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.json");

        let table = EdgeIndexTable::build();
        let truncated: Vec<Edge> = table.iter().take(100).map(|(_, e)| e).collect();
        let file = File::create(&path).unwrap();
        serde_json::to_writer(file, &truncated).unwrap();

        assert!(matches!(EdgeIndexTable::load(&path), Err(Error::Table(_))));
    }
}
