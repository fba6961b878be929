//! Conversions between `Graph` and its numeric encodings.
//!
//! The authoritative encoding is the fixed-length feature vector keyed by
//! [`EdgeIndexTable`] order. The dense symmetric matrix is the legacy
//! per-cell representation, kept for compatibility round-trips.
//!
//! Unlike the geometric transforms, the codec is loud: an edge the table
//! does not know means the graph was built outside the lattice, and that
//! is an invariant violation, not something to drop.

use crate::index::EdgeIndexTable;
use crate::model::{Edge, Graph, Qubit, CELL_QUBITS};
use crate::{Error, Result};

// ============================================================================
// Feature vector
// ============================================================================

/// Encode a graph as a dense weight vector of the table's length.
///
/// Absent edges stay 0.0; explicit 0.0 entries land on the same value, so
/// the "off" convention survives the encoding by construction.
pub fn to_vector(graph: &Graph, table: &EdgeIndexTable) -> Result<Vec<f64>> {
    let mut vector = vec![0.0; table.len()];
    for (edge, weight) in graph.entries() {
        let index = table
            .index_of(edge)
            .ok_or_else(|| Error::InvalidEdge(edge.a().0, edge.b().0))?;
        vector[index] = weight;
    }
    Ok(vector)
}

/// Decode a weight vector back into a graph via the table's reverse array.
///
/// Zero components are treated as absent edges — only non-zero weights
/// produce entries, so decode(encode(g)) reproduces exactly the non-zero
/// content of `g`.
pub fn from_vector(vector: &[f64], table: &EdgeIndexTable) -> Result<Graph> {
    if vector.len() != table.len() {
        return Err(Error::VectorLength {
            got: vector.len(),
            expected: table.len(),
        });
    }

    let mut graph = Graph::new();
    for (index, edge) in table.iter() {
        let weight = vector[index];
        if weight != 0.0 {
            graph.insert(edge, weight);
        }
    }
    Ok(graph)
}

// ============================================================================
// Legacy dense matrix
// ============================================================================

/// Minimal symmetric dense matrix over a block's qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Symmetric write: sets both `(i, j)` and `(j, i)`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
        self.data[j * self.n + i] = value;
    }
}

/// Graph → dense symmetric matrix over `cells` cells' qubits (8 per cell).
/// Biases land on the diagonal. A qubit beyond the block is an error.
pub fn to_matrix(graph: &Graph, cells: usize) -> Result<DenseMatrix> {
    let n = cells * CELL_QUBITS as usize;
    let mut matrix = DenseMatrix::zeros(n);

    for (edge, weight) in graph.entries() {
        let (i, j) = (edge.a().index(), edge.b().index());
        if j >= n {
            return Err(Error::InvalidEdge(edge.a().0, edge.b().0));
        }
        matrix.set(i, j, weight);
    }
    Ok(matrix)
}

/// Dense matrix → graph: upper triangle plus diagonal, zeros skipped.
pub fn from_matrix(matrix: &DenseMatrix) -> Graph {
    let mut graph = Graph::new();
    for i in 0..matrix.dim() {
        for j in i..matrix.dim() {
            let weight = matrix.get(i, j);
            if weight != 0.0 {
                graph.insert(Edge::new(Qubit(i as u16), Qubit(j as u16)), weight);
            }
        }
    }
    graph
}
