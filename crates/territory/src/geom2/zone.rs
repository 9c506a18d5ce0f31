//! Per-zone measurements: street length, hull area, densities.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::hull::hull_area;
use super::project::UtmZone;
use crate::graph::{Crs, Graph, NodeId};

/// Plane in which hull areas are measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaFrame {
    /// Geographic input projected into a UTM zone.
    Utm(UtmZone),
    /// Coordinates are already metric.
    Planar,
}

impl AreaFrame {
    /// Frame for `graph`: planar for metric graphs, otherwise `zone` or the UTM
    /// zone of the node-position mean.
    pub fn for_graph(graph: &Graph, zone: Option<UtmZone>) -> Self {
        match graph.crs {
            Crs::Metric => AreaFrame::Planar,
            Crs::Geographic => {
                let z = zone.unwrap_or_else(|| {
                    let n = graph.node_count().max(1) as f64;
                    let mean = graph
                        .nodes()
                        .iter()
                        .fold(Vector2::zeros(), |acc: Vector2<f64>, nd| acc + nd.pos)
                        / n;
                    UtmZone::for_lonlat(mean.x, mean.y)
                });
                AreaFrame::Utm(z)
            }
        }
    }

    #[inline]
    pub fn to_metric(&self, p: Vector2<f64>) -> Vector2<f64> {
        match self {
            AreaFrame::Utm(z) => z.project(p),
            AreaFrame::Planar => p,
        }
    }
}

fn membership(graph: &Graph, zone: &[NodeId]) -> Vec<bool> {
    let mut mask = vec![false; graph.node_count()];
    for id in zone {
        mask[id.0] = true;
    }
    mask
}

/// Sum of lengths of edges with both endpoints in `zone` (meters).
pub fn zone_length(graph: &Graph, zone: &[NodeId]) -> f64 {
    let mask = membership(graph, zone);
    graph
        .edges()
        .iter()
        .filter(|e| mask[e.u.0] && mask[e.v.0])
        .map(|e| e.length)
        .sum()
}

/// Sum of lengths of edges joining `a` and `b` (the cut).
pub fn cut_length(graph: &Graph, a: &[NodeId], b: &[NodeId]) -> f64 {
    let ma = membership(graph, a);
    let mb = membership(graph, b);
    graph
        .edges()
        .iter()
        .filter(|e| (ma[e.u.0] && mb[e.v.0]) || (mb[e.u.0] && ma[e.v.0]))
        .map(|e| e.length)
        .sum()
}

/// Convex-hull area of the zone's nodes in m²; 0 for empty or degenerate sets.
pub fn zone_area(graph: &Graph, zone: &[NodeId], frame: AreaFrame) -> f64 {
    let pts: Vec<Vector2<f64>> = zone.iter().map(|&id| frame.to_metric(graph.pos(id))).collect();
    hull_area(&pts)
}

/// `count` per km² of `area_m2`; 0 when the area is not positive.
#[inline]
pub fn density(count: f64, area_m2: f64) -> f64 {
    if area_m2 > 0.0 {
        count / (area_m2 / 1_000_000.0)
    } else {
        0.0
    }
}

/// Geometric summary of one zone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneMetrics {
    pub nodes: usize,
    pub length_m: f64,
    pub area_m2: f64,
    pub node_density_per_km2: f64,
    pub street_density_m_per_km2: f64,
}

impl ZoneMetrics {
    pub fn measure(graph: &Graph, zone: &[NodeId], frame: AreaFrame) -> Self {
        let length_m = zone_length(graph, zone);
        let area_m2 = zone_area(graph, zone, frame);
        Self {
            nodes: zone.len(),
            length_m,
            area_m2,
            node_density_per_km2: density(zone.len() as f64, area_m2),
            street_density_m_per_km2: density(length_m, area_m2),
        }
    }

    /// Copy with floats rounded to 2 decimals.
    pub fn rounded(&self) -> Self {
        Self {
            nodes: self.nodes,
            length_m: round2(self.length_m),
            area_m2: round2(self.area_m2),
            node_density_per_km2: round2(self.node_density_per_km2),
            street_density_m_per_km2: round2(self.street_density_m_per_km2),
        }
    }
}

#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
