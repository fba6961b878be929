//! End-to-end tests for the structural transforms: replication tiling and
//! cell translation, including their silent boundary-drop rule.

use pretty_assertions::assert_eq;

use chimera_rs::{ChimeraBuilder, Graph, InstanceSpec, Qubit, SpinGlassWeights};

fn unit_cell(seed: u64) -> Graph {
    let mut builder = ChimeraBuilder::seeded(seed);
    let spec = InstanceSpec::new(1, 1).unwrap().with_on_rate(1.0).unwrap();
    builder
        .create_graph(&spec, &SpinGlassWeights, &SpinGlassWeights)
        .unwrap()
}

// ============================================================================
// 1. Identity transforms
// ============================================================================

#[test]
fn test_replicate_once_is_identity() {
    let cell = unit_cell(31);
    assert_eq!(cell.replicate(1, 1), cell);
}

#[test]
fn test_translate_by_zero_is_identity() {
    let cell = unit_cell(32);
    assert_eq!(cell.translate(0, 0), cell);
}

// ============================================================================
// 2. 2×2 replication: offsets follow the 128*row + 8*column rule
// ============================================================================

#[test]
fn test_replicate_2x2_offsets_and_reach() {
    let cell = unit_cell(33);
    let block = cell.replicate(2, 2);

    // Replica offsets 0, 8, 128, 136: every original coupler must reappear
    // under each shift (nothing near the lattice edge, so nothing drops).
    // Bias entries of the overhang qubits are excluded: neighbouring
    // replicas write the same key, and the last copy wins.
    for delta in [0u16, 8, 128, 136] {
        for (edge, weight) in cell.couplers() {
            let shifted = chimera_rs::Edge::new(
                Qubit(edge.a().0 + delta),
                Qubit(edge.b().0 + delta),
            );
            assert_eq!(block.weight(shifted), Some(weight), "offset {delta}");
        }
    }

    // The block reaches no further than the replica at (1,1) plus its
    // one-cell overhang: row 2 / column 2 territory, never cell (2,2).
    for (edge, _) in block.entries() {
        let (row_a, col_a) = edge.a().cell();
        let (row_b, col_b) = edge.b().cell();
        assert!(row_a <= 2 && col_a <= 2);
        assert!(
            row_b <= 2 && col_b <= 2,
            "edge {edge} reaches cell ({row_b}, {col_b})"
        );
        assert!(
            !(row_b == 2 && col_b == 2),
            "no coupler may land in the diagonal cell (2,2)"
        );
    }
}

// ============================================================================
// 3. Replication drops only at the lattice boundary
// ============================================================================

#[test]
fn test_replicate_full_row_drops_nothing_inside_lattice() {
    let cell = unit_cell(34);
    let strip = cell.replicate(1, 15);

    // Every replica shifts by 8*column; the rightmost copy sits in column
    // 14 with its overhang in column 15 — still on the lattice.
    assert!(strip.max_qubit().unwrap().0 < 2048);
    assert_eq!(strip.shape().1, 15);
}

// ============================================================================
// 4. Translation: direction convention and boundary drops
// ============================================================================

#[test]
fn test_translate_right_moves_cells() {
    let cell = unit_cell(35);
    let shifted = cell.translate(3, 0);

    for (edge, weight) in cell.entries() {
        let moved = chimera_rs::Edge::new(
            Qubit(edge.a().0 + 24),
            Qubit(edge.b().0 + 24),
        );
        assert_eq!(shifted.weight(moved), Some(weight));
    }
}

#[test]
fn test_translate_off_left_edge_drops_every_coupler() {
    let cell = unit_cell(36);
    // Every coupler of a (0,0)-cell instance touches a qubit below 8, so
    // one cell leftward clips them all; only overhang biases survive.
    let shifted = cell.translate(-1, 0);
    assert_eq!(shifted.couplers().count(), 0);
    assert!(shifted.entries().all(|(e, _)| e.is_bias()));
}

#[test]
fn test_translate_to_bottom_row_drops_vertical_overhang() {
    let cell = unit_cell(37);
    // Down 15 rows: y is upward, so dy = -15.
    let bottom = cell.translate(0, -15);

    assert!(!bottom.is_empty());
    for (edge, _) in bottom.entries() {
        let gap = edge.b().0 - edge.a().0;
        assert_ne!(gap, 128, "vertical overhang must be clipped at row 15");
    }
    // Internal couplers of the cell survive the shift.
    assert!(bottom.weight(chimera_rs::Edge::new(Qubit(1920), Qubit(1924))).is_some());
}

// ============================================================================
// 5. Round trip: translate there and back
// ============================================================================

#[test]
fn test_translate_round_trip_preserves_interior_graph() {
    let cell = unit_cell(38);
    let there_and_back = cell.translate(5, -4).translate(-5, 4);
    assert_eq!(there_and_back, cell);
}
