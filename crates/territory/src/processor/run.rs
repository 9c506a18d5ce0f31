use crate::error::{Result, TerritoryError};
use crate::geom2::{cut_length, AreaFrame, UtmZone, ZoneMetrics};
use crate::graph::{graph_from_polygon, BoundaryPolygon, Graph, NodeId, StreetNetworkSource};
use crate::partition::partition;
use crate::quality::evaluate;

use super::result::{ProcessCfg, TerritoryResult, ZoneNodes};

fn check_employees(employees: u32) -> Result<()> {
    if employees == 1 || employees == 2 {
        Ok(())
    } else {
        Err(TerritoryError::validation(format!(
            "employee count must be 1 or 2, got {employees}"
        )))
    }
}

fn check_zone(zone: Option<UtmZone>) -> Result<()> {
    zone.map_or(Ok(()), |z| z.validate())
}

/// Process one territory: fetch and build the street graph inside `boundary`,
/// partition it for `employees` workers with the strategy named `algorithm`,
/// then measure both zones and score the split.
///
/// The employee count is validated before any data is fetched.
pub fn process<S: StreetNetworkSource + ?Sized>(
    source: &S,
    boundary: &BoundaryPolygon,
    employees: u32,
    algorithm: &str,
    cfg: &ProcessCfg,
) -> Result<TerritoryResult> {
    check_employees(employees)?;
    check_zone(cfg.utm_zone)?;
    let graph = graph_from_polygon(source, boundary, cfg.network_type)?;
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        network = %cfg.network_type,
        "street graph built"
    );
    let zone = cfg.utm_zone.unwrap_or_else(|| {
        let c = boundary.centroid();
        UtmZone::for_lonlat(c.x, c.y)
    });
    process_graph(&graph, employees, algorithm, Some(zone), cfg)
}

/// Same as [`process`] on an already built graph.
///
/// `utm_zone` overrides `cfg.utm_zone`; when both are `None` geographic graphs
/// are projected into the zone of their node mean.
pub fn process_graph(
    graph: &Graph,
    employees: u32,
    algorithm: &str,
    utm_zone: Option<UtmZone>,
    cfg: &ProcessCfg,
) -> Result<TerritoryResult> {
    check_employees(employees)?;
    let zone = utm_zone.or(cfg.utm_zone);
    check_zone(zone)?;
    let split = partition(graph, employees, algorithm, &cfg.partition)?;
    let p = &split.partition;

    let frame = AreaFrame::for_graph(graph, zone);
    let zone1 = ZoneMetrics::measure(graph, &p.zone1, frame);
    let zone2 = ZoneMetrics::measure(graph, &p.zone2, frame);
    let quality = evaluate(graph, p);
    let osm = |ids: &[NodeId]| -> Vec<i64> { ids.iter().map(|&id| graph.node(id).osm_id).collect() };

    let result = TerritoryResult {
        employees,
        crs: graph.crs,
        area_epsg: match frame {
            AreaFrame::Utm(z) => Some(z.epsg()),
            AreaFrame::Planar => None,
        },
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        total_length_m: graph.total_length(),
        cut_length_m: cut_length(graph, &p.zone1, &p.zone2),
        zone1,
        zone2,
        quality,
        algorithm: split.used,
        algorithm_requested: algorithm.to_string(),
        fallback: split.fallback.clone(),
        partition: ZoneNodes {
            zone1: osm(&p.zone1),
            zone2: osm(&p.zone2),
        },
    };
    tracing::info!(
        requested = algorithm,
        used = %result.algorithm,
        nodes = result.nodes,
        zone1 = result.zone1.nodes,
        zone2 = result.zone2.nodes,
        score = result.quality.score,
        label = %result.quality.label,
        "territory processed"
    );
    Ok(result)
}
