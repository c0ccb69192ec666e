//! Plain `.val`/`.adj` sibling-file loader.
//!
//! Given any input path, the loader reads the sibling files obtained by
//! swapping the extension for `.val` (node attributes) and `.adj`
//! (adjacency lists).
//!
//! `.val` layout: two whitespace-separated header lines (attribute names,
//! then attribute types), followed by one line per node:
//! `<id> <num_attrs> <value...>`. Columns with a non-numeric type token
//! are skipped. `.adj` layout: one line per node:
//! `<id> <num_neighbours> <neighbour_id...>`.

use crate::common_io::read_lines;
use crate::error::InputError;
use crate::graph::{GraphBuilder, SpatialGraph};
use log::info;
use std::path::Path;

const NUMERIC_TYPES: [&str; 7] = ["num", "numeric", "int", "integer", "real", "float", "double"];

fn malformed(path: &str, reason: impl Into<String>) -> InputError {
    InputError::Malformed {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn sibling(path: &str, ext: &str) -> String {
    Path::new(path)
        .with_extension(ext)
        .to_string_lossy()
        .into_owned()
}

/// Load a spatial graph from `.val`/`.adj` sibling files (plain or gzipped).
pub fn load_simple(path: &str) -> anyhow::Result<SpatialGraph> {
    let val_path = sibling(path, "val");
    let adj_path = sibling(path, "adj");
    info!("Reading spatial data from {} and {}", val_path, adj_path);

    let val_lines = read_lines(&val_path)?;
    if val_lines.len() < 2 {
        return Err(malformed(&val_path, "missing attribute header lines").into());
    }

    let names: Vec<&str> = val_lines[0].split_whitespace().collect();
    let types: Vec<&str> = val_lines[1].split_whitespace().collect();
    if names.len() != types.len() {
        return Err(malformed(&val_path, "attribute name/type header mismatch").into());
    }
    let numeric: Vec<bool> = types
        .iter()
        .map(|t| NUMERIC_TYPES.contains(&t.to_ascii_lowercase().as_str()))
        .collect();

    let mut builder = GraphBuilder::new();
    for line in &val_lines[2..] {
        let mut tokens = line.split_whitespace();
        let id: i64 = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(&val_path, format!("bad node line: '{}'", line)))?;
        let num_attr: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(&val_path, format!("bad node line: '{}'", line)))?;

        let node = builder.add_node(id)?;
        for column in 0..num_attr {
            let token = tokens.next().ok_or_else(|| {
                malformed(&val_path, format!("node {} promises {} attributes", id, num_attr))
            })?;
            if column >= names.len() || !numeric[column] {
                continue;
            }
            let value: f64 = token.parse().map_err(|_| {
                malformed(
                    &val_path,
                    format!("non-numeric value '{}' for attribute '{}'", token, names[column]),
                )
            })?;
            builder.set_attribute(node, names[column], value);
        }
    }

    let adj_lines = read_lines(&adj_path)?;
    let mut edge_count = 0;
    for line in adj_lines.iter().filter(|l| !l.trim().is_empty()) {
        let mut tokens = line.split_whitespace();
        let u_id: i64 = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(&adj_path, format!("bad adjacency line: '{}'", line)))?;
        let num_nbrs: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(&adj_path, format!("bad adjacency line: '{}'", line)))?;

        for _ in 0..num_nbrs {
            let v_id: i64 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| {
                    malformed(&adj_path, format!("node {} promises {} neighbours", u_id, num_nbrs))
                })?;
            if builder.node_index(v_id).is_none() {
                return Err(InputError::UnresolvedNeighbour { from: u_id, to: v_id }.into());
            }
            // symmetric lists name each edge twice; add it once
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

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pair(val: &str, adj: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("map.val"), val).unwrap();
        std::fs::write(dir.path().join("map.adj"), adj).unwrap();
        let path = dir.path().join("map.dat").to_str().unwrap().to_string();
        (dir, path)
    }

    #[test]
    fn test_load_path_graph() -> anyhow::Result<()> {
        let val = "rate label\nnum str\n1 2 0.5 a\n2 2 1.5 b\n3 2 2.5 c\n";
        let adj = "1 1 2\n2 2 1 3\n3 1 2\n";
        let (_dir, path) = write_pair(val, adj);

        let g = load_simple(&path)?;
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert!(g.is_connected());
        assert_eq!(g.attribute(1, "rate"), Some(1.5));
        // 'str'-typed column is skipped
        assert_eq!(g.attribute(1, "label"), None);
        Ok(())
    }

    #[test]
    fn test_unresolved_neighbour() {
        let val = "rate\nnum\n1 1 0.5\n";
        let adj = "1 1 9\n";
        let (_dir, path) = write_pair(val, adj);
        let err = load_simple(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::UnresolvedNeighbour { from: 1, to: 9 })
        ));
    }

    #[test]
    fn test_truncated_node_line() {
        let val = "rate\nnum\n1 2 0.5\n";
        let adj = "1 0\n";
        let (_dir, path) = write_pair(val, adj);
        let err = load_simple(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Malformed { .. })
        ));
    }
}
