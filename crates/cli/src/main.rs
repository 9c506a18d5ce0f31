use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use territory::api::{process, strategies, ProcessCfg};
use tracing_subscriber::fmt::SubscriberBuilder;

mod compare;
mod inputs;
mod provenance;

use inputs::Inputs;
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "territory-cli")]
#[command(about = "Split a service area's street network between field workers")]
struct Cmd {
    /// Optional run label; recorded in provenance sidecars and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Partition one territory and write the result JSON
    Process {
        /// Boundary GeoJSON (Polygon, MultiPolygon, Feature or FeatureCollection)
        #[arg(long)]
        polygon: PathBuf,
        /// Street network JSON (`{crs, nodes, edges}`)
        #[arg(long)]
        network: PathBuf,
        #[arg(long, default_value_t = 2)]
        employees: u32,
        #[arg(long, default_value = "kernighan_lin")]
        algo: String,
        #[arg(long)]
        out: PathBuf,
        /// ProcessCfg JSON; missing keys take defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep full float precision instead of 2 decimals
        #[arg(long)]
        raw: bool,
    },
    /// Run every algorithm for two employees and write one row per algorithm
    Compare {
        #[arg(long)]
        polygon: PathBuf,
        #[arg(long)]
        network: PathBuf,
        /// `.csv` or `.parquet`
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Process {
            polygon,
            network,
            employees,
            algo,
            out,
            config,
            raw,
        } => {
            let inputs = Inputs::load(&polygon, &network, config.as_deref())?;
            let payload = Payload::new(
                "process",
                json!({
                    "polygon": polygon,
                    "network": network,
                    "employees": employees,
                    "algo": algo,
                    "config": inputs.cfg,
                }),
            )
            .with_tag(cmd.tag);
            run_process(&inputs, employees, &algo, &out, raw)?;
            write_sidecar(&out, &payload)?;
            Ok(())
        }
        Action::Compare {
            polygon,
            network,
            out,
            config,
        } => {
            let inputs = Inputs::load(&polygon, &network, config.as_deref())?;
            let payload = Payload::new(
                "compare",
                json!({
                    "polygon": polygon,
                    "network": network,
                    "config": inputs.cfg,
                }),
            )
            .with_tag(cmd.tag);
            run_compare(&inputs, &out)?;
            write_sidecar(&out, &payload)?;
            Ok(())
        }
        Action::Report => report(cmd.tag),
    }
}

fn run_process(inputs: &Inputs, employees: u32, algo: &str, out: &Path, raw: bool) -> Result<()> {
    tracing::info!(employees, algo, out = %out.display(), "process");
    let result = process(&inputs.source, &inputs.boundary, employees, algo, &inputs.cfg)
        .context("processing territory")?;
    let result = if raw { result } else { result.rounded() };
    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&result)?)
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

fn run_compare(inputs: &Inputs, out: &Path) -> Result<()> {
    tracing::info!(out = %out.display(), "compare");
    let results = compare::run_all(inputs)?;
    let mut df = compare::results_frame(&results)?;
    tracing::info!(rows = df.height(), cols = df.width(), "comparison table");
    compare::write_frame(&mut df, out)
}

fn report(tag: Option<String>) -> Result<()> {
    let algorithms: Vec<&str> = strategies().iter().map(|s| s.names[0]).collect();
    let payload = Payload::new(
        "report",
        json!({
            "algorithms": algorithms,
            "defaults": ProcessCfg::default(),
        }),
    )
    .with_tag(tag);
    let doc = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn process_writes_rounded_result_and_sidecar() {
        let dir = tempdir().unwrap();
        let (polygon, network) = inputs::fixtures::write_lattice(dir.path());
        let inputs = Inputs::load(&polygon, &network, None).unwrap();
        let out = dir.path().join("runs/result.json");
        run_process(&inputs, 2, "voronoi", &out, false).unwrap();
        let sidecar = write_sidecar(&out, &Payload::new("process", json!({}))).unwrap();
        assert!(sidecar.ends_with("result.provenance.json"));

        let v: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(v["nodes"], 20);
        assert_eq!(v["algorithm"], "voronoi");
        assert_eq!(v["total_length_m"], 310.0);
    }

    #[test]
    fn process_rejects_three_employees() {
        let dir = tempdir().unwrap();
        let (polygon, network) = inputs::fixtures::write_lattice(dir.path());
        let inputs = Inputs::load(&polygon, &network, None).unwrap();
        let out = dir.path().join("result.json");
        let err = run_process(&inputs, 3, "kmeans", &out, false).unwrap_err();
        assert!(format!("{err:#}").contains("employee count"));
        assert!(!out.exists());
    }

    #[test]
    fn cli_parses_process_flags() {
        let cmd = Cmd::try_parse_from([
            "territory-cli",
            "--tag",
            "pilot",
            "process",
            "--polygon",
            "b.geojson",
            "--network",
            "n.json",
            "--out",
            "r.json",
        ])
        .unwrap();
        assert_eq!(cmd.tag.as_deref(), Some("pilot"));
        match cmd.action {
            Action::Process { employees, algo, raw, .. } => {
                assert_eq!(employees, 2);
                assert_eq!(algo, "kernighan_lin");
                assert!(!raw);
            }
            _ => panic!("expected process"),
        }
    }
}
