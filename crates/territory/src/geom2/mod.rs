//! Planar geometry for zone measurement.
//!
//! Purpose
//! - Convex hulls and shoelace areas on projected points (`hull.rs`).
//! - WGS84 → UTM projection and great-circle lengths (`project.rs`).
//! - Zone length/area/density aggregation over a partitioned graph (`zone.rs`).
//!
//! Areas are always reported in m², densities per km²; `density` never divides
//! by zero.

mod hull;
mod project;
mod zone;

pub use hull::{convex_hull, hull_area, polygon_area};
pub use project::{haversine_m, UtmZone};
pub use zone::{
    cut_length, density, round2, zone_area, zone_length, AreaFrame, ZoneMetrics,
};

#[cfg(test)]
mod tests;
