use super::*;
use crate::error::{Result, TerritoryError};
use crate::geom2::UtmZone;
use crate::graph::{special, BoundaryPolygon, Crs, NetworkType, RawNetwork, StaticNetworkSource, StreetNetworkSource};
use crate::partition::Algorithm;
use crate::quality::QualityLabel;
use nalgebra::Vector2;

/// 4×5 lattice, 10 m spacing: x in 0..=40, y in 0..=30.
fn lattice() -> StaticNetworkSource {
    StaticNetworkSource::new(special::grid_raw(4, 5, 10.0, Vector2::zeros(), Crs::Metric, None))
}

fn around_lattice() -> BoundaryPolygon {
    BoundaryPolygon::from_ring(&[[-1.0, -1.0], [41.0, -1.0], [41.0, 31.0], [-1.0, 31.0]]).unwrap()
}

struct Unreachable;

impl StreetNetworkSource for Unreachable {
    fn fetch(&self, _: &BoundaryPolygon, _: NetworkType) -> Result<RawNetwork> {
        Err(TerritoryError::unavailable("offline"))
    }
}

#[test]
fn voronoi_on_lattice() {
    let r = process(&lattice(), &around_lattice(), 2, "voronoi", &ProcessCfg::default()).unwrap();
    assert_eq!(r.nodes, 20);
    assert_eq!(r.edges, 31);
    assert!((r.total_length_m - 310.0).abs() < 1e-9);
    assert_eq!(r.zone1.nodes + r.zone2.nodes, 20);
    assert_eq!(r.partition.zone1.len(), r.zone1.nodes);
    let inside = r.zone1.length_m + r.zone2.length_m;
    assert!(inside <= r.total_length_m + 1e-9);
    assert!((inside + r.cut_length_m - r.total_length_m).abs() < 1e-9);
    assert!(r.quality.score >= 0.0 && r.quality.score <= 1.0);
    assert_eq!(r.algorithm, Algorithm::Voronoi);
    assert!(r.fallback.is_none());
    assert_eq!(r.area_epsg, None);
    assert!(r.partition.zone1.contains(&0));
    assert!(r.partition.zone2.contains(&19));
}

#[test]
fn single_employee_takes_everything() {
    let r = process(&lattice(), &around_lattice(), 1, "spectral", &ProcessCfg::default()).unwrap();
    assert_eq!(r.algorithm, Algorithm::SingleZone);
    assert_eq!(r.algorithm_requested, "spectral");
    assert_eq!(r.quality.score, 1.0);
    assert_eq!(r.quality.label, QualityLabel::Excellent);
    assert_eq!(r.zone1.nodes, 20);
    assert!((r.zone1.length_m - 310.0).abs() < 1e-9);
    assert!((r.zone1.area_m2 - 1200.0).abs() < 1e-9);
    assert_eq!(r.zone2, crate::geom2::ZoneMetrics::default());
    assert!(r.partition.zone2.is_empty());
    assert_eq!(r.cut_length_m, 0.0);
}

#[test]
fn unknown_algorithm_matches_kernighan_lin() {
    let cfg = ProcessCfg::default();
    let kl = process(&lattice(), &around_lattice(), 2, "kernighan_lin", &cfg).unwrap();
    let other = process(&lattice(), &around_lattice(), 2, "simulated_annealing", &cfg).unwrap();
    assert_eq!(other.partition, kl.partition);
    assert_eq!(other.algorithm, Algorithm::KernighanLin);
    assert_eq!(other.algorithm_requested, "simulated_annealing");
    assert!(other.fallback.is_some());
    assert_eq!(other.zone1, kl.zone1);
}

#[test]
fn employee_count_is_checked_before_fetching() {
    for bad in [0, 3] {
        let err = process(&Unreachable, &around_lattice(), bad, "kmeans", &ProcessCfg::default())
            .unwrap_err();
        assert!(matches!(err, TerritoryError::Validation { .. }), "{err}");
    }
    let err = process(&Unreachable, &around_lattice(), 2, "kmeans", &ProcessCfg::default())
        .unwrap_err();
    assert!(matches!(err, TerritoryError::DataUnavailable { .. }));
}

#[test]
fn out_of_range_utm_zone_is_rejected() {
    let parsed = serde_json::from_str::<ProcessCfg>(r#"{"utm_zone": {"zone": 0, "north": true}}"#);
    assert!(parsed.is_err());
    let cfg: ProcessCfg =
        serde_json::from_str(r#"{"utm_zone": {"zone": 60, "north": false}}"#).unwrap();
    assert_eq!(cfg.utm_zone.map(|z| z.epsg()), Some(32760));

    let bad = ProcessCfg {
        utm_zone: Some(UtmZone { zone: 61, north: true }),
        ..ProcessCfg::default()
    };
    let err = process(&Unreachable, &around_lattice(), 2, "kmeans", &bad).unwrap_err();
    assert!(matches!(err, TerritoryError::Validation { .. }), "{err}");
    let g = special::grid(2, 3, 10.0).unwrap();
    let err = process_graph(&g, 2, "kmeans", Some(UtmZone { zone: 0, north: true }), &ProcessCfg::default())
        .unwrap_err();
    assert!(matches!(err, TerritoryError::Validation { .. }), "{err}");
}

#[test]
fn boundary_off_the_network_is_unavailable() {
    let far = BoundaryPolygon::from_ring(&[[500.0, 500.0], [600.0, 500.0], [600.0, 600.0]]).unwrap();
    let err = process(&lattice(), &far, 2, "kmeans", &ProcessCfg::default()).unwrap_err();
    assert!(matches!(err, TerritoryError::DataUnavailable { .. }));
}

#[test]
fn geographic_areas_use_the_centroid_zone() {
    let origin = Vector2::new(-100.3, 25.7);
    let raw = special::grid_raw(3, 3, 0.001, origin, Crs::Geographic, None);
    let source = StaticNetworkSource::new(raw);
    let boundary = BoundaryPolygon::from_ring(&[
        [-100.3005, 25.6995],
        [-100.2975, 25.6995],
        [-100.2975, 25.7025],
        [-100.3005, 25.7025],
    ])
    .unwrap();
    let r = process(&source, &boundary, 1, "current", &ProcessCfg::default()).unwrap();
    assert_eq!(r.area_epsg, Some(32614));
    // ~200 m × ~222 m
    assert!(r.zone1.area_m2 > 40_000.0 && r.zone1.area_m2 < 50_000.0, "{}", r.zone1.area_m2);
    assert!(r.zone1.node_density_per_km2 > 0.0);
}

#[test]
fn rounded_keeps_two_decimals() {
    let g = special::grid(3, 4, 3.333).unwrap();
    let r = process_graph(&g, 2, "kmeans", None, &ProcessCfg::default()).unwrap();
    let q = r.rounded();
    for v in [q.total_length_m, q.zone1.length_m, q.zone2.area_m2, q.quality.score] {
        assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6, "{v}");
    }
    assert_eq!(q.partition, r.partition);
    assert_eq!(q.quality.label, r.quality.label);
}

#[test]
fn result_serializes_with_snake_case_names() {
    let g = special::grid(2, 3, 10.0).unwrap();
    let r = process_graph(&g, 2, "kmeans", None, &ProcessCfg::default()).unwrap();
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["algorithm"], "kmeans");
    assert_eq!(v["crs"], "metric");
    assert!(v["quality"]["label"].is_string());
    assert_eq!(v["partition"]["zone1"].as_array().map(Vec::len), Some(r.zone1.nodes));
}

#[test]
fn partial_config_takes_defaults() {
    let cfg: ProcessCfg =
        serde_json::from_str(r#"{"network_type": "drive", "partition": {"seed": 7}}"#).unwrap();
    assert_eq!(cfg.network_type, NetworkType::Drive);
    assert_eq!(cfg.partition.seed, 7);
    assert_eq!(cfg.partition.kl_max_iter, 10);
    assert_eq!(cfg.utm_zone, None);
    let empty: ProcessCfg = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, ProcessCfg::default());
}
