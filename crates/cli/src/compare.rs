//! Per-algorithm comparison table: every registered strategy on one graph,
//! one row each, written as CSV (or Parquet for `.parquet` outputs).

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use territory::api::{process_graph, strategies, TerritoryResult};

use crate::inputs::Inputs;

/// Run every registered strategy for two employees on the inputs' graph.
pub fn run_all(inputs: &Inputs) -> Result<Vec<TerritoryResult>> {
    let graph = inputs.graph()?;
    let zone = inputs.utm_zone();
    strategies()
        .iter()
        .map(|s| {
            let name = s.names[0];
            process_graph(&graph, 2, name, Some(zone), &inputs.cfg)
                .map(|r| r.rounded())
                .with_context(|| format!("running {name}"))
        })
        .collect()
}

fn column<T>(name: &str, results: &[TerritoryResult], f: impl Fn(&TerritoryResult) -> T) -> Series
where
    Series: NamedFrom<Vec<T>, [T]>,
{
    Series::new(name.into(), results.iter().map(f).collect::<Vec<T>>())
}

/// One row per result.
pub fn results_frame(results: &[TerritoryResult]) -> PolarsResult<DataFrame> {
    let r = results;
    DataFrame::new(vec![
        column("algorithm", r, |r| r.algorithm_requested.clone()),
        column("algorithm_used", r, |r| r.algorithm.to_string()),
        column("zone1_nodes", r, |r| r.zone1.nodes as u64),
        column("zone2_nodes", r, |r| r.zone2.nodes as u64),
        column("zone1_length_m", r, |r| r.zone1.length_m),
        column("zone2_length_m", r, |r| r.zone2.length_m),
        column("zone1_area_m2", r, |r| r.zone1.area_m2),
        column("zone2_area_m2", r, |r| r.zone2.area_m2),
        column("zone1_node_density_km2", r, |r| r.zone1.node_density_per_km2),
        column("zone2_node_density_km2", r, |r| r.zone2.node_density_per_km2),
        column("zone1_street_density_m_km2", r, |r| r.zone1.street_density_m_per_km2),
        column("zone2_street_density_m_km2", r, |r| r.zone2.street_density_m_per_km2),
        column("cut_length_m", r, |r| r.cut_length_m),
        column("silhouette", r, |r| r.quality.score),
        column("quality", r, |r| r.quality.label.to_string()),
        column("fallback", r, |r| r.fallback.clone().unwrap_or_default()),
    ])
}

/// Write `df` to `out`; the extension picks the format (`.parquet`, else CSV).
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    crate::ensure_parent(out)?;
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if out.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(&mut file)
            .finish(df)
            .with_context(|| format!("writing {}", out.display()))?;
    } else {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("writing {}", out.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::write_lattice;
    use tempfile::tempdir;

    #[test]
    fn one_row_per_strategy_round_trips_through_csv() {
        let dir = tempdir().unwrap();
        let (polygon, network) = write_lattice(dir.path());
        let inputs = Inputs::load(&polygon, &network, None).unwrap();
        let results = run_all(&inputs).unwrap();
        assert_eq!(results.len(), strategies().len());
        for r in &results {
            assert_eq!(r.zone1.nodes + r.zone2.nodes, 20);
        }

        let mut df = results_frame(&results).unwrap();
        assert_eq!(df.height(), strategies().len());
        let out = dir.path().join("out/compare.csv");
        write_frame(&mut df, &out).unwrap();

        let back = LazyCsvReader::new(&out)
            .with_infer_schema_length(Some(100))
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(back.shape(), df.shape());
        let names = back.column("algorithm").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("kernighan_lin"));
    }
}
