//! End-to-end tests for the vector and matrix codecs against the shared
//! edge-index table, including the round-trip law.

use std::sync::OnceLock;

use proptest::prelude::*;

use chimera_rs::{
    codec, ChimeraBuilder, EdgeIndexTable, Graph, InstanceSpec, SpinGlassWeights,
    EDGE_UNIVERSE,
};

fn table() -> &'static EdgeIndexTable {
    static TABLE: OnceLock<EdgeIndexTable> = OnceLock::new();
    TABLE.get_or_init(EdgeIndexTable::build)
}

// ============================================================================
// 1. Builder graphs encode without misses and decode to their live content
// ============================================================================

#[test]
fn test_builder_graph_round_trips() {
    let mut builder = ChimeraBuilder::seeded(21);
    let spec = InstanceSpec::new(3, 3).unwrap();
    let graph = builder
        .create_graph(&spec, &SpinGlassWeights, &SpinGlassWeights)
        .unwrap();

    let vector = codec::to_vector(&graph, table()).unwrap();
    assert_eq!(vector.len(), EDGE_UNIVERSE);

    let decoded = codec::from_vector(&vector, table()).unwrap();

    // Explicit "off" entries become implicit zeros; everything non-zero
    // survives exactly.
    for (edge, weight) in graph.entries() {
        if weight != 0.0 {
            assert_eq!(decoded.weight(edge), Some(weight));
        } else {
            assert_eq!(decoded.weight(edge), None);
        }
    }
    for (edge, weight) in decoded.entries() {
        assert_eq!(graph.weight(edge), Some(weight));
    }
}

// ============================================================================
// 2. Vector slots line up with table indices
// ============================================================================

#[test]
fn test_vector_slots_match_table_indices() {
    let graph = Graph::from_entries([((0, 4), 0.667), ((0, 0), 0.3333)]);
    let vector = codec::to_vector(&graph, table()).unwrap();

    let bias_index = table()
        .index_of(chimera_rs::Edge::bias(chimera_rs::Qubit(0)))
        .unwrap();
    let coupler_index = table()
        .index_of(chimera_rs::Edge::new(chimera_rs::Qubit(0), chimera_rs::Qubit(4)))
        .unwrap();

    assert_eq!(vector[bias_index], 0.3333);
    assert_eq!(vector[coupler_index], 0.667);
    assert_eq!(vector.iter().filter(|&&w| w != 0.0).count(), 2);
}

// ============================================================================
// 3. Matrix codec round-trips a replicated block
// ============================================================================

#[test]
fn test_matrix_round_trip_replicated_block() {
    let mut builder = ChimeraBuilder::seeded(22);
    let spec = InstanceSpec::new(1, 1).unwrap().with_on_rate(1.0).unwrap();
    let cell = builder
        .create_graph(&spec, &SpinGlassWeights, &SpinGlassWeights)
        .unwrap();
    let block = cell.replicate(2, 2);

    // 2×2 block of 1-cell replicas spans qubits up to cell (2, 1).
    let cells = block.qubit_count().div_ceil(8);
    let matrix = codec::to_matrix(&block, cells).unwrap();
    let decoded = codec::from_matrix(&matrix);

    for (edge, weight) in block.entries() {
        if weight != 0.0 {
            assert_eq!(decoded.weight(edge), Some(weight));
        }
    }
}

// ============================================================================
// 4. Property: decode(encode(g)) == g for table-domain graphs
// ============================================================================

fn arb_table_graph() -> impl Strategy<Value = Graph> {
    // Pick distinct table slots and non-zero grid weights.
    prop::collection::btree_map(
        0..EDGE_UNIVERSE,
        prop::sample::select(vec![-1.0, -0.625, -0.25, 0.125, 0.5, 0.875]),
        0..64,
    )
    .prop_map(|slots| {
        let mut graph = Graph::new();
        for (index, weight) in slots {
            graph.insert(table().edge_at(index).unwrap(), weight);
        }
        graph
    })
}

proptest! {
    #[test]
    fn prop_round_trip_is_identity(graph in arb_table_graph()) {
        let vector = codec::to_vector(&graph, table()).unwrap();
        let decoded = codec::from_vector(&vector, table()).unwrap();
        prop_assert_eq!(decoded, graph);
    }

    #[test]
    fn prop_vector_weight_count_matches_graph(graph in arb_table_graph()) {
        let vector = codec::to_vector(&graph, table()).unwrap();
        prop_assert_eq!(
            vector.iter().filter(|&&w| w != 0.0).count(),
            graph.len()
        );
    }
}
