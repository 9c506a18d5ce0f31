//! Street graph model.
//!
//! Purpose
//! - Turn a territory boundary plus a street-network source into an immutable
//!   undirected graph whose edges carry real-world lengths in meters.
//! - Keep the fetch (the only blocking step) behind `StreetNetworkSource` so
//!   everything downstream is pure computation on an owned `Graph`.
//!
//! Layout
//! - `types.rs` (Graph, Node, Edge, NodeId), `polygon.rs` (boundary parsing and
//!   point-in-polygon), `source.rs` (raw data + source trait), `build.rs`
//!   (collapse to undirected), `special.rs` (synthetic lattices).

mod build;
mod polygon;
mod source;
pub mod special;
mod types;

pub use build::{build_graph, graph_from_polygon};
pub use polygon::BoundaryPolygon;
pub use source::{
    NetworkType, RawEdge, RawNetwork, RawNode, StaticNetworkSource, StreetNetworkSource,
};
pub use types::{Crs, Edge, Graph, Node, NodeId};
