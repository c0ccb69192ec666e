//! GeoJSON-style feature-collection loader.
//!
//! Expects a document with a `features` array; each feature carries a
//! numeric `id`, a `properties` object (only numeric members are kept as
//! node attributes), and a `neighbours` array of node ids describing the
//! adjacency structure. Each undirected edge is added once, when the
//! feature id is smaller than the neighbour id.

use crate::common_io::open_buf_reader;
use crate::error::InputError;
use crate::graph::{GraphBuilder, SpatialGraph};
use log::info;
use serde_json::Value;

fn malformed(path: &str, reason: impl Into<String>) -> InputError {
    InputError::Malformed {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Load a spatial graph from a GeoJSON-style file (plain or gzipped).
pub fn load_geojson(path: &str) -> anyhow::Result<SpatialGraph> {
    info!("Reading spatial data from GeoJSON: {}", path);

    let reader = open_buf_reader(path)?;
    let doc: Value = serde_json::from_reader(reader)
        .map_err(|e| malformed(path, format!("invalid JSON: {}", e)))?;

    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(path, "missing 'features' array"))?;

    // First pass: declare every node and its numeric attributes
    let mut builder = GraphBuilder::new();
    for feature in features {
        let id = feature
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| malformed(path, "feature without a numeric 'id'"))?;
        let node = builder.add_node(id)?;

        if let Some(properties) = feature.get("properties").and_then(Value::as_object) {
            for (name, value) in properties {
                // only numeric attributes are used
                if let Some(x) = value.as_f64() {
                    builder.set_attribute(node, name, x);
                }
            }
        }
    }

    // Second pass: edges from the neighbour lists
    let mut edge_count = 0;
    for feature in features {
        let u_id = feature
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| malformed(path, "feature without a numeric 'id'"))?;
        let neighbours = feature
            .get("neighbours")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                malformed(path, format!("feature {} without a 'neighbours' array", u_id))
            })?;

        for nb in neighbours {
            let v_id = nb.as_i64().ok_or_else(|| {
                malformed(path, format!("non-numeric neighbour id on feature {}", u_id))
            })?;
            if builder.node_index(v_id).is_none() {
                return Err(InputError::UnresolvedNeighbour { from: u_id, to: v_id }.into());
            }
            // each undirected edge once
            if u_id < v_id {
                builder.add_edge_by_id(u_id, v_id)?;
                edge_count += 1;
            }
        }
    }

    let graph = builder.build();
    info!("Read {} nodes and {} edges", graph.num_nodes(), edge_count);
    Ok(graph)
}
