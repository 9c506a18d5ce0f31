//! Graph construction from raw (directed) street data.

use std::collections::{BTreeMap, HashMap};

use nalgebra::Vector2;

use super::polygon::BoundaryPolygon;
use super::source::{NetworkType, RawNetwork, StreetNetworkSource};
use super::types::{Crs, Edge, Graph, Node, NodeId};
use crate::error::{Result, TerritoryError};
use crate::geom2::haversine_m;

/// Fetch the street network for `boundary` and build the undirected graph.
pub fn graph_from_polygon<S: StreetNetworkSource + ?Sized>(
    source: &S,
    boundary: &BoundaryPolygon,
    network: NetworkType,
) -> Result<Graph> {
    let raw = source.fetch(boundary, network)?;
    build_graph(&raw)
}

/// Collapse directed raw data into an undirected graph.
///
/// - Opposite-direction and parallel segments between the same pair of nodes
///   become one edge keeping the larger length (and that segment's geometry).
/// - Missing lengths are measured along the geometry, else between endpoints
///   (great-circle for geographic data, planar for metric data).
/// - Segments that reference unknown nodes are dropped.
pub fn build_graph(raw: &RawNetwork) -> Result<Graph> {
    let mut index: HashMap<i64, NodeId> = HashMap::with_capacity(raw.nodes.len());
    let mut nodes: Vec<Node> = Vec::with_capacity(raw.nodes.len());
    for rn in &raw.nodes {
        if !(rn.x.is_finite() && rn.y.is_finite()) {
            return Err(TerritoryError::unavailable(format!(
                "node {} has non-finite coordinates",
                rn.id
            )));
        }
        if index.contains_key(&rn.id) {
            continue;
        }
        index.insert(rn.id, NodeId(nodes.len()));
        nodes.push(Node {
            osm_id: rn.id,
            pos: Vector2::new(rn.x, rn.y),
        });
    }

    let mut merged: BTreeMap<(NodeId, NodeId), Edge> = BTreeMap::new();
    let mut dangling = 0usize;
    for re in &raw.edges {
        let (Some(&a), Some(&b)) = (index.get(&re.u), index.get(&re.v)) else {
            dangling += 1;
            continue;
        };
        let length = match re.length {
            Some(l) if l.is_finite() && l >= 0.0 => l,
            Some(l) => {
                return Err(TerritoryError::unavailable(format!(
                    "segment {}->{} has invalid length {l}",
                    re.u, re.v
                )))
            }
            None => measure(raw.crs, &nodes[a.0].pos, &nodes[b.0].pos, re.geometry.as_deref()),
        };
        let key = if a <= b { (a, b) } else { (b, a) };
        let candidate = Edge {
            u: key.0,
            v: key.1,
            length,
            geometry: re.geometry.clone(),
        };
        match merged.get_mut(&key) {
            Some(existing) if existing.length >= candidate.length => {}
            Some(existing) => *existing = candidate,
            None => {
                merged.insert(key, candidate);
            }
        }
    }
    if dangling > 0 {
        tracing::warn!(dangling, "dropped segments referencing unknown nodes");
    }
    if merged.is_empty() {
        return Err(TerritoryError::unavailable(
            "street network has no edges for the boundary",
        ));
    }
    let edges: Vec<Edge> = merged.into_values().collect();
    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        directed = raw.edges.len(),
        "built undirected street graph"
    );
    Graph::from_parts(raw.crs, nodes, edges)
}

fn measure(crs: Crs, a: &Vector2<f64>, b: &Vector2<f64>, geometry: Option<&[[f64; 2]]>) -> f64 {
    let dist = |p: Vector2<f64>, q: Vector2<f64>| match crs {
        Crs::Geographic => haversine_m(p, q),
        Crs::Metric => (q - p).norm(),
    };
    match geometry {
        Some(line) if line.len() >= 2 => line
            .windows(2)
            .map(|w| dist(Vector2::new(w[0][0], w[0][1]), Vector2::new(w[1][0], w[1][1])))
            .sum(),
        _ => dist(*a, *b),
    }
}
