//! Curated surface for the CLI and other in-workspace callers.
//!
//! Groups the building blocks by stage so callers that run stages separately
//! (e.g. comparing every strategy on one graph) do not reach into submodules.

// Graph construction
pub use crate::graph::{
    build_graph, graph_from_polygon, special, BoundaryPolygon, Crs, Graph, NetworkType, NodeId,
    RawNetwork, StaticNetworkSource, StreetNetworkSource,
};
// Partitioning
pub use crate::partition::{
    lookup, partition, resolve, strategies, Algorithm, Partition, PartitionCfg, Split, Strategy,
};
// Measurement and scoring
pub use crate::geom2::{cut_length, round2, AreaFrame, UtmZone, ZoneMetrics};
pub use crate::quality::{evaluate, silhouette_score, QualityLabel, QualityScore};
// Orchestration
pub use crate::processor::{process, process_graph, ProcessCfg, TerritoryResult, ZoneNodes};
