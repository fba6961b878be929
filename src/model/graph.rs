//! The weighted graph mapping: couplers and biases in one canonical map.
//!
//! Zero weights are explicit entries ("off" couplers), matching the wire
//! convention of the annealer input files. Graphs are value types —
//! `replicate` and `translate` always build a new graph.

use hashbrown::HashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

use super::edge::Edge;
use super::qubit::Qubit;

/// A Chimera problem instance: canonical `Edge → weight`, biases included
/// as self-pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    weights: HashMap<Edge, f64>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw id pairs; endpoints are canonicalized on the way in.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((u16, u16), f64)>,
    {
        let mut graph = Graph::new();
        for ((n1, n2), w) in entries {
            graph.insert(Edge::new(Qubit(n1), Qubit(n2)), w);
        }
        graph
    }

    pub fn insert(&mut self, edge: Edge, weight: f64) {
        self.weights.insert(edge, weight);
    }

    pub fn weight(&self, edge: Edge) -> Option<f64> {
        self.weights.get(&edge).copied()
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.weights.contains_key(&edge)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Edge, f64)> + '_ {
        self.weights.iter().map(|(e, w)| (*e, *w))
    }

    /// Entries in canonical edge order — the deterministic view used by
    /// serialization and the solver wire formats.
    pub fn sorted_entries(&self) -> Vec<(Edge, f64)> {
        let mut entries: Vec<_> = self.entries().collect();
        entries.sort_by_key(|(e, _)| *e);
        entries
    }

    pub fn couplers(&self) -> impl Iterator<Item = (Edge, f64)> + '_ {
        self.entries().filter(|(e, _)| !e.is_bias())
    }

    pub fn biases(&self) -> impl Iterator<Item = (Qubit, f64)> + '_ {
        self.entries()
            .filter(|(e, _)| e.is_bias())
            .map(|(e, w)| (e.a(), w))
    }

    /// Every qubit that appears as an endpoint, sorted.
    pub fn qubits(&self) -> BTreeSet<Qubit> {
        let mut qubits = BTreeSet::new();
        for (edge, _) in self.entries() {
            qubits.insert(edge.a());
            qubits.insert(edge.b());
        }
        qubits
    }

    pub fn node_count(&self) -> usize {
        self.qubits().len()
    }

    pub fn max_qubit(&self) -> Option<Qubit> {
        self.entries().map(|(e, _)| e.b()).max()
    }

    /// Qubits the instance spans, counted from zero: `max id + 1`.
    /// This is the figure the annealer file header carries.
    pub fn qubit_count(&self) -> usize {
        self.max_qubit().map_or(0, |q| q.index() + 1)
    }

    /// Shape in cells, `(rows, columns)`, inferred from the maximum qubit id.
    ///
    /// A generated cell always carries a coupler into the row below, so its
    /// maximum id crosses the 128 boundary and the division counts it. The
    /// row count is clamped to 1 for graphs confined to row 0 with no such
    /// overhang (hand-built biases, translated fragments).
    pub fn shape(&self) -> (usize, usize) {
        let max = self.max_qubit().map_or(0, Qubit::index);
        let rows = (max / 128).max(1);
        let columns = (max % 128) / 8 + 1;
        (rows, columns)
    }

    /// Tile this graph's edge pattern over a `rows`×`columns` block of
    /// copies, offsetting each copy by its position times the input shape.
    ///
    /// Weights are copied, not redrawn. Edges whose shifted endpoints leave
    /// the lattice are silently dropped — partial windows at the boundary
    /// are expected.
    pub fn replicate(&self, rows: usize, columns: usize) -> Graph {
        let (shape_rows, shape_columns) = self.shape();
        let row_stride = (128 * shape_rows) as i32;
        let column_stride = (8 * shape_columns) as i32;

        let mut replicated = Graph::new();
        for row in 0..rows {
            for column in 0..columns {
                let delta = row_stride * row as i32 + column_stride * column as i32;
                for (edge, w) in self.entries() {
                    let (Some(n1), Some(n2)) =
                        (edge.a().offset(delta), edge.b().offset(delta))
                    else {
                        continue;
                    };
                    replicated.insert(Edge::new(n1, n2), w);
                }
            }
        }
        replicated
    }

    /// Shift the whole graph by `dx` cells rightward and `dy` cells upward.
    ///
    /// Same drop rule as [`Graph::replicate`]: edges pushed off the lattice
    /// vanish rather than erroring.
    pub fn translate(&self, dx: i32, dy: i32) -> Graph {
        let delta = 8 * dx - 128 * dy;

        let mut translated = Graph::new();
        for (edge, w) in self.entries() {
            let (Some(n1), Some(n2)) = (edge.a().offset(delta), edge.b().offset(delta)) else {
                continue;
            };
            translated.insert(Edge::new(n1, n2), w);
        }
        translated
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let triples: Vec<(u16, u16, f64)> = self
            .sorted_entries()
            .into_iter()
            .map(|(e, w)| (e.a().0, e.b().0, w))
            .collect();
        triples.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let triples = Vec::<(u16, u16, f64)>::deserialize(deserializer)?;
        Ok(Graph::from_entries(
            triples.into_iter().map(|(n1, n2, w)| ((n1, n2), w)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_canonicalizes() {
        let mut g = Graph::new();
        g.insert(Edge::new(Qubit(131), Qubit(3)), 0.5);
        assert_eq!(g.weight(Edge::new(Qubit(3), Qubit(131))), Some(0.5));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_shape_single_cell_with_overhang() {
        // A cell plus its forced vertical coupler reaches qubit 131.
        let g = Graph::from_entries([((0, 4), 1.0), ((3, 131), -0.5)]);
        assert_eq!(g.shape(), (1, 1));
        assert_eq!(g.qubit_count(), 132);
    }

    #[test]
    fn test_shape_clamps_rowless_graph() {
        let g = Graph::from_entries([((0, 4), 1.0), ((7, 15), 0.25)]);
        assert_eq!(g.shape(), (1, 2));
    }

    #[test]
    fn test_serde_is_sorted_and_round_trips() {
        let g = Graph::from_entries([((5, 13), -1.0), ((0, 0), 0.25), ((0, 4), 0.0)]);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, "[[0,0,0.25],[0,4,0.0],[5,13,-1.0]]");
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
