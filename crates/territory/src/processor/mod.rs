//! Territory processing: boundary → graph → partition → metrics → quality.
//!
//! Purpose
//! - One synchronous call per request; the graph and partition are owned by the
//!   call and dropped on return. No state survives between calls, so concurrent
//!   requests only need their own `ProcessCfg`.
//! - Either a complete `TerritoryResult` comes back or the request fails; there
//!   are no partial results.
//!
//! Layout
//! - `result.rs`: `ProcessCfg` and the serializable `TerritoryResult`.
//! - `run.rs`: `process` (fetches through a `StreetNetworkSource`) and
//!   `process_graph` (already built graph).

mod result;
mod run;

pub use result::{ProcessCfg, TerritoryResult, ZoneNodes};
pub use run::{process, process_graph};

#[cfg(test)]
mod tests;
