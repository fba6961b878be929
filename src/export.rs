//! Solver wire formats — serialize a graph for the annealing boundary.
//!
//! Both solver integrations consume the same instance text:
//!
//! ```text
//! <num_qubits> <num_entries>
//! <n1> <n2> <weight>
//! ...
//! ```
//!
//! The simulated-annealing binary reads it from a file; the cloud API
//! takes it verbatim as the `data` field of the JSON submission body.
//! Entries are written in canonical edge order so the same graph always
//! renders to the same bytes.

use std::io::Write;

use serde_json::{json, Value};

use crate::model::{Edge, Graph, Qubit, QUBIT_COUNT};
use crate::{Error, Result};

/// Problem class for the cloud annealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    Ising,
    Qubo,
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemType::Ising => write!(f, "ising"),
            ProblemType::Qubo => write!(f, "qubo"),
        }
    }
}

/// Render the instance text. `num_qubits` is the qubit budget the solver
/// reserves: the spanned count for annealer files, the full 2048 for
/// cloud submissions.
pub fn render_instance(graph: &Graph, num_qubits: usize) -> String {
    let entries = graph.sorted_entries();

    let mut text = format!("{} {}\n", num_qubits, entries.len());
    for (edge, weight) in entries {
        text.push_str(&format!(
            "{} {} {}\n",
            edge.a(),
            edge.b(),
            format_weight(weight)
        ));
    }
    text
}

pub fn write_instance(
    graph: &Graph,
    num_qubits: usize,
    writer: &mut dyn Write,
) -> Result<()> {
    writer.write_all(render_instance(graph, num_qubits).as_bytes())?;
    Ok(())
}

/// Inverse of [`render_instance`]. The header's entry count is checked
/// against the body.
pub fn parse_instance(text: &str) -> Result<Graph> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::Instance("empty input".into()))?;
    let mut fields = header.split_whitespace();
    let _num_qubits: usize = parse_field(fields.next(), header)?;
    let num_entries: usize = parse_field(fields.next(), header)?;

    let mut graph = Graph::new();
    for line in lines {
        let mut fields = line.split_whitespace();
        let n1: u16 = parse_field(fields.next(), line)?;
        let n2: u16 = parse_field(fields.next(), line)?;
        let weight: f64 = parse_field(fields.next(), line)?;
        graph.insert(Edge::new(Qubit(n1), Qubit(n2)), weight);
    }

    if graph.len() != num_entries {
        return Err(Error::Instance(format!(
            "header promises {num_entries} entries, body has {}",
            graph.len()
        )));
    }
    Ok(graph)
}

/// JSON submission body for the cloud annealer:
/// `{"solver", "data", "type", "params"}`. The HTTP POST itself belongs
/// to the caller.
pub fn problem_payload(
    graph: &Graph,
    solver: &str,
    problem_type: ProblemType,
    params: Value,
) -> Value {
    json!({
        "solver": solver,
        "data": render_instance(graph, QUBIT_COUNT as usize),
        "type": problem_type.to_string(),
        "params": params,
    })
}

/// Weights keep a decimal point even when integral ("-1.0", not "-1") so
/// rendered instances match what the downstream tooling was built against.
fn format_weight(weight: f64) -> String {
    if weight == weight.trunc() && weight.is_finite() {
        format!("{weight:.1}")
    } else {
        format!("{weight}")
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: &str) -> Result<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| Error::Instance(format!("bad line: {line:?}")))
}
