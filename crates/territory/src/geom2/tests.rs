use super::*;
use crate::graph::{special, Crs, NodeId};
use nalgebra::Vector2;

#[test]
fn zone_lengths_exclude_cut_edges() {
    // 2×3 lattice, columns {0,1} vs {2}
    let g = special::grid(2, 3, 10.0).unwrap();
    let left = vec![NodeId(0), NodeId(1), NodeId(3), NodeId(4)];
    let right = vec![NodeId(2), NodeId(5)];
    let l1 = zone_length(&g, &left);
    let l2 = zone_length(&g, &right);
    let cut = cut_length(&g, &left, &right);
    assert!((l1 - 40.0).abs() < 1e-12);
    assert!((l2 - 10.0).abs() < 1e-12);
    assert!((cut - 20.0).abs() < 1e-12);
    assert!((l1 + l2 + cut - g.total_length()).abs() < 1e-9);
}

#[test]
fn empty_zone_measures_zero() {
    let g = special::grid(2, 2, 10.0).unwrap();
    assert_eq!(zone_area(&g, &[], AreaFrame::Planar), 0.0);
    assert_eq!(zone_length(&g, &[]), 0.0);
    assert_eq!(density(0.0, 0.0), 0.0);
    assert_eq!(density(5.0, -1.0), 0.0);
    let m = ZoneMetrics::measure(&g, &[], AreaFrame::Planar);
    assert_eq!(m, ZoneMetrics::default());
}

#[test]
fn planar_zone_metrics() {
    let g = special::grid(3, 3, 100.0).unwrap();
    let all: Vec<NodeId> = g.node_ids().collect();
    let m = ZoneMetrics::measure(&g, &all, AreaFrame::for_graph(&g, None));
    assert_eq!(m.nodes, 9);
    assert!((m.area_m2 - 40_000.0).abs() < 1e-6);
    assert!((m.length_m - 1_200.0).abs() < 1e-9);
    // 9 nodes over 0.04 km²
    assert!((m.node_density_per_km2 - 225.0).abs() < 1e-6);
    assert!((m.street_density_m_per_km2 - 30_000.0).abs() < 1e-3);
}

#[test]
fn geographic_area_is_projected() {
    let raw = special::grid_raw(2, 2, 0.001, Vector2::new(-100.31, 25.68), Crs::Geographic, None);
    let g = crate::graph::build_graph(&raw).unwrap();
    let frame = AreaFrame::for_graph(&g, None);
    assert!(matches!(frame, AreaFrame::Utm(z) if z.zone == 14));
    let all: Vec<NodeId> = g.node_ids().collect();
    let area = zone_area(&g, &all, frame);
    // ≈ 100.3 m × 110.8 m
    assert!(area > 10_500.0 && area < 11_700.0, "area={area}");
}

#[test]
fn rounding_two_decimals() {
    assert_eq!(round2(1.23456), 1.23);
    assert_eq!(round2(-3.14159), -3.14);
}
