//! Canonical edges and the per-cell coupler templates.
//!
//! An edge is an unordered qubit pair stored sorted, so every undirected
//! pair has exactly one map key. A self-pair `(q, q)` is a bias entry,
//! not a coupler.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::qubit::{Qubit, CELL_QUBITS, GRID_COLUMNS, QUBIT_COUNT};

/// A coupler template as a pair of cell-relative qubit ids.
pub type CellTemplate = (u16, u16);

/// Intra-cell couplers: the complete bipartite wiring between the
/// `{0,1,2,3}` and `{4,5,6,7}` shores.
pub const INTERNAL_COUPLERS: [CellTemplate; 16] = [
    (0, 4), (0, 5), (0, 6), (0, 7),
    (1, 4), (1, 5), (1, 6), (1, 7),
    (2, 4), (2, 5), (2, 6), (2, 7),
    (3, 4), (3, 5), (3, 6), (3, 7),
];

/// Couplers into the cell one column to the right.
pub const HORIZONTAL_COUPLERS: [CellTemplate; 4] = [(4, 12), (5, 13), (6, 14), (7, 15)];

/// Couplers into the cell one row down.
pub const VERTICAL_COUPLERS: [CellTemplate; 4] = [(0, 128), (1, 129), (2, 130), (3, 131)];

/// Canonical undirected edge: endpoints sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    a: Qubit,
    b: Qubit,
}

impl Edge {
    /// Canonicalizing constructor — endpoint order never matters.
    pub fn new(n1: Qubit, n2: Qubit) -> Self {
        if n1 <= n2 {
            Edge { a: n1, b: n2 }
        } else {
            Edge { a: n2, b: n1 }
        }
    }

    /// The self-pair carrying a qubit's field term.
    pub const fn bias(q: Qubit) -> Self {
        Edge { a: q, b: q }
    }

    pub const fn a(&self) -> Qubit {
        self.a
    }

    pub const fn b(&self) -> Qubit {
        self.b
    }

    pub const fn endpoints(&self) -> (Qubit, Qubit) {
        (self.a, self.b)
    }

    /// Bias entries never contribute to adjacency.
    pub fn is_bias(&self) -> bool {
        self.a == self.b
    }

    pub const fn in_bounds(&self) -> bool {
        self.a.in_bounds() && self.b.in_bounds()
    }

    /// Place a cell-relative template at an absolute cell.
    ///
    /// Returns `None` when an endpoint leaves the lattice, or when a
    /// horizontal coupler in the rightmost column would wrap into the
    /// first cell of the next row (ids stay in range there, so the wrap
    /// has to be rejected explicitly).
    pub fn place(template: CellTemplate, row: u16, column: u16) -> Option<Edge> {
        let offset = 128 * row + CELL_QUBITS * column;
        let n1 = offset + template.0;
        let n2 = offset + template.1;

        if column == GRID_COLUMNS - 1 {
            let wrap = 128 * (row + 1)..128 * (row + 1) + CELL_QUBITS;
            if wrap.contains(&n1) || wrap.contains(&n2) {
                return None;
            }
        }

        if n1 < QUBIT_COUNT && n2 < QUBIT_COUNT {
            Some(Edge::new(Qubit(n1), Qubit(n2)))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

impl Serialize for Edge {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.a.0, self.b.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Edge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (n1, n2) = <(u16, u16)>::deserialize(deserializer)?;
        let edge = Edge::new(Qubit(n1), Qubit(n2));
        if !edge.in_bounds() {
            return Err(D::Error::custom(format!(
                "edge ({n1}, {n2}) outside the 2048-qubit lattice"
            )));
        }
        Ok(edge)
    }
}
