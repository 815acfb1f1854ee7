//! CSV topology loader.
//!
//! # CSV format
//!
//! Two files, each with a header row.  Nodes:
//!
//! ```csv
//! id,x,y,class
//! 17,0.0,0.0,0
//! 18,100.0,0.0,0
//! ```
//!
//! Edges (an empty `length` means the Euclidean distance of the endpoints):
//!
//! ```csv
//! id,from,to,length,class
//! 1,17,18,,2
//! ```
//!
//! External node ids are arbitrary integers and are remapped to dense
//! `NodeId`s in file order.  `class` defaults to 0 when the column is absent.
//!
//! Any malformed record is fatal: duplicate ids, unknown endpoints, self
//! loops, negative or non-finite numbers, or a node file with no rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use ng_core::{ClassId, NodeId, Point};

use crate::{NetworkBuilder, NetworkGraph, SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:    i64,
    x:     f64,
    y:     f64,
    #[serde(default)]
    class: u16,
}

#[derive(Deserialize)]
struct EdgeRecord {
    id:     i64,
    from:   i64,
    to:     i64,
    length: Option<f64>,
    #[serde(default)]
    class:  u16,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from a node file and an edge file.
pub fn load_network(nodes: &Path, edges: &Path) -> SpatialResult<NetworkGraph> {
    let net = load_network_named(
        File::open(nodes)?,
        &nodes.display().to_string(),
        File::open(edges)?,
        &edges.display().to_string(),
    )?;
    info!(
        "loaded network: {} nodes, {} edges from {} / {}",
        net.node_count(),
        net.edge_count(),
        nodes.display(),
        edges.display()
    );
    Ok(net)
}

/// Like [`load_network`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded topologies.
pub fn load_network_readers<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<NetworkGraph> {
    load_network_named(nodes, "nodes", edges, "edges")
}

fn load_network_named<N: Read, E: Read>(
    nodes: N,
    nodes_name: &str,
    edges: E,
    edges_name: &str,
) -> SpatialResult<NetworkGraph> {
    let mut builder = NetworkBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut id_map: FxHashMap<i64, NodeId> = FxHashMap::default();
    for (i, result) in reader(nodes).deserialize::<NodeRecord>().enumerate() {
        let record = i as u64 + 1;
        let row = result?;
        let fail = |reason: String| load_error(nodes_name, record, reason);

        if id_map.contains_key(&row.id) {
            return Err(fail(format!("duplicate node id {}", row.id)));
        }
        let pos = Point::new(row.x, row.y);
        let id = builder
            .add_node(pos, ClassId(row.class))
            .map_err(|_| fail(format!("node {} has non-finite coordinates {pos}", row.id)))?;
        id_map.insert(row.id, id);
    }
    if builder.node_count() == 0 {
        return Err(SpatialError::EmptyNetwork);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_ids: FxHashSet<i64> = FxHashSet::default();
    for (i, result) in reader(edges).deserialize::<EdgeRecord>().enumerate() {
        let record = i as u64 + 1;
        let row = result?;
        let fail = |reason: String| load_error(edges_name, record, reason);

        if !edge_ids.insert(row.id) {
            return Err(fail(format!("duplicate edge id {}", row.id)));
        }
        let resolve = |ext: i64| {
            id_map
                .get(&ext)
                .copied()
                .ok_or_else(|| fail(format!("edge {} references unknown node {ext}", row.id)))
        };
        let a = resolve(row.from)?;
        let b = resolve(row.to)?;
        let class = ClassId(row.class);

        let added = match row.length {
            Some(length) => builder.add_edge(a, b, length, class),
            None => builder.add_edge_auto(a, b, class),
        };
        added.map_err(|e| fail(format!("edge {}: {e}", row.id)))?;
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn load_error(file: &str, record: u64, reason: String) -> SpatialError {
    SpatialError::Load { file: file.to_owned(), record, reason }
}
