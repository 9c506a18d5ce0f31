use serde::{Deserialize, Serialize};

use crate::geom2::{round2, UtmZone, ZoneMetrics};
use crate::graph::{Crs, NetworkType};
use crate::partition::{Algorithm, PartitionCfg};
use crate::quality::QualityScore;

/// Request-level configuration. Missing JSON keys take the defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessCfg {
    pub network_type: NetworkType,
    /// Projection for area measurement of geographic graphs; `None` uses the
    /// UTM zone of the boundary centroid.
    pub utm_zone: Option<UtmZone>,
    pub partition: PartitionCfg,
}

/// Upstream (OSM) node ids per zone, for downstream rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneNodes {
    pub zone1: Vec<i64>,
    pub zone2: Vec<i64>,
}

/// Everything one request produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryResult {
    pub employees: u32,
    pub crs: Crs,
    /// EPSG code of the plane areas were measured in (`None` for metric input).
    pub area_epsg: Option<u32>,
    pub nodes: usize,
    pub edges: usize,
    pub total_length_m: f64,
    pub cut_length_m: f64,
    pub zone1: ZoneMetrics,
    pub zone2: ZoneMetrics,
    pub quality: QualityScore,
    /// Strategy that produced the partition.
    pub algorithm: Algorithm,
    pub algorithm_requested: String,
    pub fallback: Option<String>,
    pub partition: ZoneNodes,
}

impl TerritoryResult {
    /// Copy with metric floats rounded to 2 decimals (the score label is kept).
    pub fn rounded(&self) -> Self {
        let mut out = self.clone();
        out.total_length_m = round2(self.total_length_m);
        out.cut_length_m = round2(self.cut_length_m);
        out.zone1 = self.zone1.rounded();
        out.zone2 = self.zone2.rounded();
        out.quality.score = round2(self.quality.score);
        out
    }

    /// `zone1` and `zone2` metrics in order.
    pub fn zones(&self) -> [&ZoneMetrics; 2] {
        [&self.zone1, &self.zone2]
    }
}
