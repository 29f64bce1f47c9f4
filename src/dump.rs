//! JSON-lines persistence for graphs.
//!
//! The first record is a header carrying the vertex count; every undirected
//! edge follows as one record with `u < v`.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    adjacency::{AdjacencySet, VertexId},
    errors::GraphIsoError,
    graph::Graph,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DumpRecord {
    Header { vertex_count: usize },
    Edge { u: VertexId, v: VertexId },
}

pub fn dump_graph_to_path<A: AdjacencySet, P: AsRef<Path>>(
    graph: &Graph<A>,
    path: P,
) -> Result<(), GraphIsoError> {
    let file = File::create(path.as_ref()).map_err(|e| GraphIsoError::io(e.to_string()))?;
    dump_graph_to_writer(graph, BufWriter::new(file))
}

pub fn dump_graph_to_writer<A: AdjacencySet, W: Write>(
    graph: &Graph<A>,
    mut writer: W,
) -> Result<(), GraphIsoError> {
    write_record(
        &mut writer,
        &DumpRecord::Header {
            vertex_count: graph.vertex_count(),
        },
    )?;
    for (u, v) in graph.edges() {
        write_record(&mut writer, &DumpRecord::Edge { u, v })?;
    }
    writer.flush().map_err(|e| GraphIsoError::io(e.to_string()))
}

pub fn load_graph_from_path<A: AdjacencySet, P: AsRef<Path>>(
    path: P,
) -> Result<Graph<A>, GraphIsoError> {
    let file = File::open(path.as_ref()).map_err(|e| GraphIsoError::io(e.to_string()))?;
    load_graph_from_reader(BufReader::new(file))
}

/// Rebuilds and finalizes a graph. Edges out of range or forming self-loops
/// fail with `InvalidVertexIndex`, read failures with `Io`, and anything else
/// malformed (including a vertex count too large to allocate) is `InvalidInput`.
pub fn load_graph_from_reader<A: AdjacencySet, R: BufRead>(
    reader: R,
) -> Result<Graph<A>, GraphIsoError> {
    let mut graph: Option<Graph<A>> = None;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| GraphIsoError::io(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: DumpRecord = serde_json::from_str(&line).map_err(|e| {
            GraphIsoError::invalid_input(format!("line {}: {e}", line_no + 1))
        })?;
        match record {
            DumpRecord::Header { vertex_count } => {
                if graph.is_some() {
                    return Err(GraphIsoError::invalid_input(format!(
                        "line {}: duplicate header",
                        line_no + 1
                    )));
                }
                graph = Some(Graph::try_new(vertex_count)?);
            }
            DumpRecord::Edge { u, v } => match graph.as_mut() {
                Some(graph) => graph.add_edge(u, v)?,
                None => {
                    return Err(GraphIsoError::invalid_input(format!(
                        "line {}: edge before header",
                        line_no + 1
                    )));
                }
            },
        }
    }
    let mut graph = graph.ok_or_else(|| GraphIsoError::invalid_input("missing header"))?;
    graph.finalize()?;
    Ok(graph)
}

fn write_record<W: Write>(writer: &mut W, record: &DumpRecord) -> Result<(), GraphIsoError> {
    serde_json::to_writer(&mut *writer, record).map_err(|e| GraphIsoError::io(e.to_string()))?;
    writer
        .write_all(b"\n")
        .map_err(|e| GraphIsoError::io(e.to_string()))
}
