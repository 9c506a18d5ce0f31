//! Street-network source seam.
//!
//! The engine never downloads map data itself. A `StreetNetworkSource` hands back
//! directed raw data for a boundary; `build_graph` turns it into an undirected
//! `Graph`. This is the only place a blocking fetch may happen, so callers can
//! keep partitioning and scoring free of external resources.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::polygon::BoundaryPolygon;
use super::types::Crs;
use crate::error::{Result, TerritoryError};

/// Which street layer to request from the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    #[default]
    Walk,
    Drive,
    Bike,
    All,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Walk => "walk",
            NetworkType::Drive => "drive",
            NetworkType::Bike => "bike",
            NetworkType::All => "all",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = TerritoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "walk" => Ok(NetworkType::Walk),
            "drive" => Ok(NetworkType::Drive),
            "bike" => Ok(NetworkType::Bike),
            "all" => Ok(NetworkType::All),
            other => Err(TerritoryError::validation(format!(
                "unknown network type `{other}`"
            ))),
        }
    }
}

/// Raw intersection as delivered by a source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

/// Raw directed segment; `length` may be missing and is then derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub u: i64,
    pub v: i64,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub geometry: Option<Vec<[f64; 2]>>,
}

/// Directed street data for one boundary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNetwork {
    #[serde(default)]
    pub crs: Crs,
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawNetwork {
    /// Keep only nodes inside `boundary` and edges whose endpoints both survive.
    pub fn truncate_to(&self, boundary: &BoundaryPolygon) -> RawNetwork {
        let nodes: Vec<RawNode> = self
            .nodes
            .iter()
            .filter(|n| boundary.contains(n.x, n.y))
            .cloned()
            .collect();
        let kept: std::collections::HashSet<i64> = nodes.iter().map(|n| n.id).collect();
        let edges = self
            .edges
            .iter()
            .filter(|e| kept.contains(&e.u) && kept.contains(&e.v))
            .cloned()
            .collect();
        RawNetwork {
            crs: self.crs,
            nodes,
            edges,
        }
    }
}

/// Provider of raw street data for a boundary polygon.
///
/// Implementations must report missing data, timeouts, and malformed
/// responses as `TerritoryError::DataUnavailable`.
pub trait StreetNetworkSource {
    fn fetch(&self, boundary: &BoundaryPolygon, network: NetworkType) -> Result<RawNetwork>;
}

/// Source backed by an already loaded network (e.g. a cached extract on disk).
///
/// `fetch` truncates the stored network to the boundary. The stored network is
/// assumed to hold the requested layer; `network` is only logged.
#[derive(Clone, Debug, Default)]
pub struct StaticNetworkSource {
    network: RawNetwork,
}

impl StaticNetworkSource {
    pub fn new(network: RawNetwork) -> Self {
        Self { network }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let network: RawNetwork = serde_json::from_str(s)
            .map_err(|e| TerritoryError::unavailable(format!("malformed network json: {e}")))?;
        Ok(Self::new(network))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TerritoryError::unavailable(format!("reading {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}

impl StreetNetworkSource for StaticNetworkSource {
    fn fetch(&self, boundary: &BoundaryPolygon, network: NetworkType) -> Result<RawNetwork> {
        let raw = self.network.truncate_to(boundary);
        tracing::debug!(
            network = %network,
            nodes = raw.nodes.len(),
            edges = raw.edges.len(),
            "static source truncated to boundary"
        );
        if raw.edges.is_empty() {
            return Err(TerritoryError::unavailable(format!(
                "no {network} edges inside the boundary"
            )));
        }
        Ok(raw)
    }
}
