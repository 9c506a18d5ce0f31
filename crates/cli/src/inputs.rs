//! Loading request inputs from disk: boundary GeoJSON, cached street network
//! JSON and an optional `ProcessCfg` JSON.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use territory::api::{
    graph_from_polygon, BoundaryPolygon, Graph, ProcessCfg, StaticNetworkSource, UtmZone,
};

pub struct Inputs {
    pub boundary: BoundaryPolygon,
    pub source: StaticNetworkSource,
    pub cfg: ProcessCfg,
}

impl Inputs {
    pub fn load(polygon: &Path, network: &Path, config: Option<&Path>) -> Result<Self> {
        let text = fs::read_to_string(polygon)
            .with_context(|| format!("reading boundary {}", polygon.display()))?;
        let geojson: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing boundary {}", polygon.display()))?;
        let boundary = BoundaryPolygon::from_geojson(&geojson)
            .with_context(|| format!("boundary {}", polygon.display()))?;
        let source = StaticNetworkSource::from_path(network)
            .with_context(|| format!("street network {}", network.display()))?;
        let cfg = match config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ProcessCfg::default(),
        };
        Ok(Self {
            boundary,
            source,
            cfg,
        })
    }

    /// Build the street graph once (for runs that reuse it across strategies).
    pub fn graph(&self) -> Result<Graph> {
        graph_from_polygon(&self.source, &self.boundary, self.cfg.network_type)
            .context("building street graph")
    }

    /// Configured projection zone, else the zone of the boundary centroid.
    pub fn utm_zone(&self) -> UtmZone {
        self.cfg.utm_zone.unwrap_or_else(|| {
            let c = self.boundary.centroid();
            UtmZone::for_lonlat(c.x, c.y)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_inputs_with_partial_config() {
        let dir = tempdir().unwrap();
        let (polygon, network) = fixtures::write_lattice(dir.path());
        let config = dir.path().join("cfg.json");
        fs::write(&config, r#"{"partition": {"seed": 9}}"#).unwrap();
        let inputs = Inputs::load(&polygon, &network, Some(&config)).unwrap();
        assert_eq!(inputs.cfg.partition.seed, 9);
        assert_eq!(inputs.graph().unwrap().node_count(), 20);
    }

    #[test]
    fn config_with_invalid_utm_zone_is_rejected() {
        let dir = tempdir().unwrap();
        let (polygon, network) = fixtures::write_lattice(dir.path());
        let config = dir.path().join("cfg.json");
        fs::write(&config, r#"{"utm_zone": {"zone": 0, "north": true}}"#).unwrap();
        let err = Inputs::load(&polygon, &network, Some(&config)).err().unwrap();
        let msg = format!("{err:#}");
        assert!(msg.contains("cfg.json") && msg.contains("1..=60"), "{msg}");

        fs::write(&config, r#"{"utm_zone": {"zone": 14, "north": true}}"#).unwrap();
        let inputs = Inputs::load(&polygon, &network, Some(&config)).unwrap();
        assert_eq!(inputs.utm_zone().epsg(), 32614);
    }

    #[test]
    fn missing_files_name_the_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.geojson");
        let err = Inputs::load(&missing, &missing, None).err().unwrap();
        assert!(format!("{err:#}").contains("nope.geojson"));
    }
}
