//! Provenance sidecars: every artifact `out/x.json` gets `out/x.provenance.json`
//! recording the code revision, library version, call site, parameters and
//! outputs, so a result table can be traced back to the run that made it.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata recorded in a sidecar.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    /// Free-form run labels (`--tag`).
    pub tags: Vec<String>,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tags.extend(tag);
        self
    }
}

/// Provenance block shared by sidecars and `report`.
pub fn document(payload: &Payload, outputs: &[String]) -> Value {
    json!({
        "code_rev": current_git_rev(),
        "territory_version": territory::VERSION,
        "command": payload.command,
        "tags": payload.tags,
        "params": payload.params,
        "outputs": outputs,
    })
}

/// Write `<artifact>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: &Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    let callsite = Location::caller();
    let mut doc = document(payload, &[artifact.to_string_lossy().into_owned()]);
    doc["callsite"] = json!({ "file": callsite.file(), "line": callsite.line() });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "provenance written");
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else `unknown`.
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_artifact() {
        assert_eq!(
            provenance_path(Path::new("/tmp/runs/zones.csv")),
            Path::new("/tmp/runs/zones.provenance.json")
        );
        assert_eq!(
            provenance_path(Path::new("result")),
            Path::new("result.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_params_and_tags() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("result.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new("process", json!({"algo": "kmeans", "employees": 2}))
            .with_tag(Some("pilot".into()));
        let path = write_sidecar(&artifact, &payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["algo"], "kmeans");
        assert_eq!(parsed["tags"][0], "pilot");
        assert_eq!(parsed["command"], "process");
        assert!(parsed["callsite"]["line"].as_u64().is_some());
    }
}
