//! Territory partitioning engine.
//!
//! Splits the walkable street network inside a service-area boundary into one
//! or two zones, measures each zone and scores the split.
//!
//! Flow
//! - `graph`: boundary + `StreetNetworkSource` → undirected `Graph` (meters).
//! - `partition`: strategy registry; unknown names fall back to Kernighan–Lin.
//! - `geom2`: zone length, convex-hull area (UTM for geographic input), densities.
//! - `quality`: silhouette score with fixed degenerate-case sentinels.
//! - `processor`: `process` ties the above together into a `TerritoryResult`.
//!
//! Everything after the network fetch is pure, synchronous computation on data
//! owned by the call.

pub mod api;
pub mod error;
pub mod geom2;
pub mod graph;
pub mod partition;
pub mod processor;
pub mod quality;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Result, TerritoryError};
pub use nalgebra::Vector2 as Vec2;
pub use processor::{process, process_graph, ProcessCfg, TerritoryResult};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Result, TerritoryError};
    pub use crate::graph::{BoundaryPolygon, Graph, NetworkType, StaticNetworkSource, StreetNetworkSource};
    pub use crate::partition::{Algorithm, PartitionCfg};
    pub use crate::processor::{process, process_graph, ProcessCfg, TerritoryResult};
    pub use crate::quality::{QualityLabel, QualityScore};
    pub use nalgebra::Vector2 as Vec2;
}
