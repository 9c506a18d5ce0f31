//! WGS84 → UTM projection and great-circle distance.
//!
//! Areas are measured after projecting `[lon, lat]` into the UTM zone that
//! contains the territory; at neighborhood scale the scale error of the
//! transverse Mercator series below is far under a part per thousand.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerritoryError};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const UTM_K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
/// Mean Earth radius (IUGG), meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// UTM zone (1..=60) and hemisphere.
///
/// Deserialization rejects zones outside `1..=60`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUtmZone")]
pub struct UtmZone {
    pub zone: u8,
    pub north: bool,
}

#[derive(Deserialize)]
struct RawUtmZone {
    zone: u8,
    north: bool,
}

impl TryFrom<RawUtmZone> for UtmZone {
    type Error = TerritoryError;

    fn try_from(raw: RawUtmZone) -> Result<Self> {
        Self::new(raw.zone, raw.north)
    }
}

impl UtmZone {
    pub fn new(zone: u8, north: bool) -> Result<Self> {
        let z = Self { zone, north };
        z.validate()?;
        Ok(z)
    }

    /// `Validation` unless the zone number is within `1..=60`.
    pub fn validate(&self) -> Result<()> {
        if (1..=60).contains(&self.zone) {
            Ok(())
        } else {
            Err(TerritoryError::validation(format!(
                "utm zone must be within 1..=60, got {}",
                self.zone
            )))
        }
    }

    /// Zone containing `(lon, lat)` (plain 6° bands, no Norway/Svalbard exceptions).
    pub fn for_lonlat(lon: f64, lat: f64) -> Self {
        let band = ((lon + 180.0) / 6.0).floor() as i64 + 1;
        Self {
            zone: band.clamp(1, 60) as u8,
            north: lat >= 0.0,
        }
    }

    /// EPSG code of the zone (326xx north, 327xx south).
    pub fn epsg(&self) -> u32 {
        if self.north {
            32600 + self.zone as u32
        } else {
            32700 + self.zone as u32
        }
    }

    #[inline]
    fn central_meridian(&self) -> f64 {
        (self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    /// Forward transverse Mercator: `[lon, lat]` degrees → `[easting, northing]` meters.
    pub fn project(&self, lonlat: Vector2<f64>) -> Vector2<f64> {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);

        let phi = lonlat.y.to_radians();
        let dlam = (lonlat.x - self.central_meridian()).to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = sin_phi / cos_phi;

        let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let a = cos_phi * dlam;
        let m = WGS84_A
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;
        let easting = UTM_K0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
            + FALSE_EASTING;
        let mut northing = UTM_K0
            * (m + n
                * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));
        if !self.north {
            northing += FALSE_NORTHING_SOUTH;
        }
        Vector2::new(easting, northing)
    }
}

/// Great-circle distance in meters between two `[lon, lat]` points.
pub fn haversine_m(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let (lat1, lat2) = (a.y.to_radians(), b.y.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.x - a.x).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_selection() {
        // Monterrey, MX
        let z = UtmZone::for_lonlat(-100.31, 25.68);
        assert_eq!(z.zone, 14);
        assert!(z.north);
        assert_eq!(z.epsg(), 32614);
        let s = UtmZone::for_lonlat(151.2, -33.9);
        assert_eq!(s.epsg(), 32756);
        assert_eq!(UtmZone::for_lonlat(180.0, 0.0).zone, 60);
    }

    #[test]
    fn zone_number_is_range_checked() {
        assert!(UtmZone::new(1, true).is_ok());
        assert!(UtmZone::new(60, false).is_ok());
        assert!(matches!(
            UtmZone::new(0, true),
            Err(TerritoryError::Validation { .. })
        ));
        assert!(UtmZone { zone: 61, north: true }.validate().is_err());

        let ok: UtmZone = serde_json::from_str(r#"{"zone": 14, "north": true}"#).unwrap();
        assert_eq!(ok.epsg(), 32614);
        let err = serde_json::from_str::<UtmZone>(r#"{"zone": 0, "north": true}"#).unwrap_err();
        assert!(err.to_string().contains("1..=60"), "{err}");
        assert!(serde_json::from_str::<UtmZone>(r#"{"zone": 99, "north": false}"#).is_err());
    }

    #[test]
    fn central_meridian_on_equator() {
        let z = UtmZone { zone: 31, north: true };
        let p = z.project(Vector2::new(3.0, 0.0));
        assert!((p.x - 500_000.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn projected_distance_matches_great_circle() {
        let a = Vector2::new(-100.31, 25.68);
        let b = Vector2::new(-100.30, 25.69);
        let z = UtmZone::for_lonlat(a.x, a.y);
        let planar = (z.project(b) - z.project(a)).norm();
        let sphere = haversine_m(a, b);
        assert!((planar - sphere).abs() / sphere < 5e-3, "{planar} vs {sphere}");
    }
}
