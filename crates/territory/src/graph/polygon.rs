//! Territory boundary parsed from a GeoJSON-like geometry.
//!
//! Accepted shapes: `Polygon`, `MultiPolygon` (first member), `Feature` wrapping
//! either, or a `FeatureCollection` whose first feature is one. Only the exterior
//! ring is kept; holes do not affect truncation of the street network.

use nalgebra::Vector2;
use serde_json::Value;

use crate::error::{Result, TerritoryError};

/// Closed exterior ring of `[lon, lat]` vertices (closing vertex not repeated).
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryPolygon {
    ring: Vec<Vector2<f64>>,
}

impl BoundaryPolygon {
    /// Build from a ring; a repeated closing vertex is dropped.
    pub fn from_ring(points: &[[f64; 2]]) -> Result<Self> {
        let mut ring: Vec<Vector2<f64>> = Vec::with_capacity(points.len());
        for p in points {
            if !(p[0].is_finite() && p[1].is_finite()) {
                return Err(TerritoryError::validation(format!(
                    "boundary vertex [{}, {}] is not finite",
                    p[0], p[1]
                )));
            }
            let v = Vector2::new(p[0], p[1]);
            if ring.last().is_some_and(|last| (last - v).norm() < 1e-12) {
                continue;
            }
            ring.push(v);
        }
        if ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() < 1e-12 {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(TerritoryError::validation(
                "boundary ring needs at least 3 distinct vertices",
            ));
        }
        Ok(Self { ring })
    }

    /// Parse a GeoJSON geometry, feature, or feature collection.
    pub fn from_geojson(value: &Value) -> Result<Self> {
        let kind = value.get("type").and_then(Value::as_str).ok_or_else(|| {
            TerritoryError::validation("boundary object has no GeoJSON `type`")
        })?;
        match kind {
            "FeatureCollection" => {
                let first = value
                    .get("features")
                    .and_then(Value::as_array)
                    .and_then(|fs| fs.first())
                    .ok_or_else(|| TerritoryError::validation("feature collection is empty"))?;
                Self::from_geojson(first)
            }
            "Feature" => {
                let geom = value
                    .get("geometry")
                    .filter(|g| !g.is_null())
                    .ok_or_else(|| TerritoryError::validation("feature has no geometry"))?;
                Self::from_geojson(geom)
            }
            "Polygon" => {
                let rings = coordinates(value)?;
                let exterior = rings
                    .first()
                    .ok_or_else(|| TerritoryError::validation("polygon has no rings"))?;
                Self::from_ring(&ring_points(exterior)?)
            }
            "MultiPolygon" => {
                let polys = coordinates(value)?;
                let exterior = polys
                    .first()
                    .and_then(Value::as_array)
                    .and_then(|rings| rings.first())
                    .ok_or_else(|| TerritoryError::validation("multipolygon has no rings"))?;
                Self::from_ring(&ring_points(exterior)?)
            }
            other => Err(TerritoryError::validation(format!(
                "unsupported boundary geometry `{other}`"
            ))),
        }
    }

    #[inline]
    pub fn ring(&self) -> &[Vector2<f64>] {
        &self.ring
    }

    /// Even-odd ray casting; points exactly on the boundary may go either way.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.ring.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (self.ring[i], self.ring[j]);
            if (pi.y > y) != (pj.y > y) {
                let x_cross = (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x;
                if x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Vertex mean; used to pick the projection zone.
    pub fn centroid(&self) -> Vector2<f64> {
        let sum = self
            .ring
            .iter()
            .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p);
        sum / self.ring.len() as f64
    }
}

fn coordinates(value: &Value) -> Result<&Vec<Value>> {
    value
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| TerritoryError::validation("geometry has no `coordinates` array"))
}

fn ring_points(ring: &Value) -> Result<Vec<[f64; 2]>> {
    let arr = ring
        .as_array()
        .ok_or_else(|| TerritoryError::validation("ring is not an array"))?;
    arr.iter()
        .map(|pt| {
            let xy = pt.as_array().filter(|c| c.len() >= 2);
            match xy.map(|c| (c[0].as_f64(), c[1].as_f64())) {
                Some((Some(x), Some(y))) => Ok([x, y]),
                _ => Err(TerritoryError::validation(format!(
                    "malformed ring coordinate {pt}"
                ))),
            }
        })
        .collect()
}
