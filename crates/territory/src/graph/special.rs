//! Synthetic street networks used in tests, benchmarks and CLI demos.
//!
//! - `grid_raw`: rows×cols lattice with both travel directions per segment,
//!   as a source would deliver it.
//! - `grid`: the same lattice already collapsed into a `Graph`.
//!
//! Node `(r, c)` gets upstream id `r * cols + c` and position
//! `origin + (c * spacing, r * spacing)`. Metric grids use meters; geographic
//! grids use degrees for `spacing` and report lengths in meters via haversine.

use nalgebra::Vector2;

use super::build::build_graph;
use super::source::{RawEdge, RawNetwork, RawNode};
use super::types::{Crs, Graph};
use crate::error::Result;

/// Directed lattice: every street segment appears as `u→v` and `v→u`.
///
/// `length = None` leaves lengths to be measured by `build_graph`.
pub fn grid_raw(
    rows: usize,
    cols: usize,
    spacing: f64,
    origin: Vector2<f64>,
    crs: Crs,
    length: Option<f64>,
) -> RawNetwork {
    let id = |r: usize, c: usize| (r * cols + c) as i64;
    let mut nodes = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            nodes.push(RawNode {
                id: id(r, c),
                x: origin.x + c as f64 * spacing,
                y: origin.y + r as f64 * spacing,
            });
        }
    }
    let mut edges = Vec::new();
    let mut both = |a: i64, b: i64| {
        edges.push(RawEdge {
            u: a,
            v: b,
            length,
            geometry: None,
        });
        edges.push(RawEdge {
            u: b,
            v: a,
            length,
            geometry: None,
        });
    };
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                both(id(r, c), id(r, c + 1));
            }
            if r + 1 < rows {
                both(id(r, c), id(r + 1, c));
            }
        }
    }
    RawNetwork { crs, nodes, edges }
}

/// Metric lattice with uniform segment length `spacing` meters.
pub fn grid(rows: usize, cols: usize, spacing: f64) -> Result<Graph> {
    build_graph(&grid_raw(
        rows,
        cols,
        spacing,
        Vector2::zeros(),
        Crs::Metric,
        Some(spacing),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_and_length() {
        let g = grid(4, 5, 10.0).unwrap();
        assert_eq!(g.node_count(), 20);
        // 4 rows × 4 horizontal + 3 × 5 vertical
        assert_eq!(g.edge_count(), 31);
        assert!((g.total_length() - 310.0).abs() < 1e-9);
    }

    #[test]
    fn raw_grid_is_directed() {
        let raw = grid_raw(2, 2, 1.0, Vector2::zeros(), Crs::Metric, None);
        assert_eq!(raw.edges.len(), 8);
    }
}
