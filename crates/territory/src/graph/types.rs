//! Data types for the undirected street graph.
//!
//! Nodes are dense indices (`NodeId`) into `Graph::nodes`; the upstream
//! identifier of each intersection is kept on the node for output.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerritoryError};

/// Dense node index into `Graph::nodes`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Coordinate reference of node positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crs {
    /// `x` = longitude, `y` = latitude (degrees, WGS84).
    #[default]
    Geographic,
    /// Already projected to a metric plane (meters).
    Metric,
}

/// Street intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub osm_id: i64,
    pub pos: Vector2<f64>,
}

/// Undirected street segment with `u <= v`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
    /// Real-world length in meters (always finite and >= 0).
    pub length: f64,
    /// Polyline for rendering only; never read by partitioning.
    pub geometry: Option<Vec<[f64; 2]>>,
}

impl Edge {
    #[inline]
    pub fn other(&self, n: NodeId) -> NodeId {
        if self.u == n {
            self.v
        } else {
            self.u
        }
    }
}

/// Immutable undirected street graph; adjacency holds edge indices per node.
#[derive(Clone, Debug)]
pub struct Graph {
    pub crs: Crs,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    adj: Vec<Vec<usize>>,
}

impl Graph {
    /// Assemble a graph, checking that edges reference existing nodes and carry
    /// finite non-negative lengths.
    pub fn from_parts(crs: Crs, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let n = nodes.len();
        let mut adj = vec![Vec::new(); n];
        for (k, e) in edges.iter().enumerate() {
            if e.u.0 >= n || e.v.0 >= n {
                return Err(TerritoryError::validation(format!(
                    "edge {k} references missing node ({}, {})",
                    e.u.0, e.v.0
                )));
            }
            if !e.length.is_finite() || e.length < 0.0 {
                return Err(TerritoryError::validation(format!(
                    "edge {k} has invalid length {}",
                    e.length
                )));
            }
            adj[e.u.0].push(k);
            if e.v != e.u {
                adj[e.v.0].push(k);
            }
        }
        Ok(Self {
            crs,
            nodes,
            edges,
            adj,
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn pos(&self, id: NodeId) -> Vector2<f64> {
        self.nodes[id.0].pos
    }

    /// All node positions in index order.
    pub fn positions(&self) -> Vec<Vector2<f64>> {
        self.nodes.iter().map(|n| n.pos).collect()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Incident edges of `id` as `(neighbor, edge)`; self-loops appear once.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.adj[id.0].iter().map(move |&k| {
            let e = &self.edges[k];
            (e.other(id), e)
        })
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adj[id.0].len()
    }

    /// Sum of all edge lengths (meters).
    pub fn total_length(&self) -> f64 {
        self.edges.iter().map(|e| e.length).sum()
    }
}
