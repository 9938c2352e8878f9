use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand and its effective parameters.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write each `(path, contents)` pair and one provenance sidecar named after the first path.
#[track_caller]
pub fn write_artifacts(artifacts: &[(PathBuf, Vec<u8>)], payload: Payload) -> Result<PathBuf> {
    for (path, contents) in artifacts {
        ensure_parent(path)?;
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "artifact written");
    }
    let paths: Vec<&Path> = artifacts.iter().map(|(p, _)| p.as_path()).collect();
    write_sidecar(&paths, payload)
}

/// Write `<stem>.provenance.json` for `outputs[0]` with the git commit, callsite,
/// command, params, and every output path.
#[track_caller]
pub fn write_sidecar(outputs: &[&Path], payload: Payload) -> Result<PathBuf> {
    let first = outputs.first().context("provenance needs at least one output")?;
    let sidecar = provenance_path(first);
    ensure_parent(&sidecar)?;

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": geopuzzle::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": payload.command,
        "params": payload.params,
        "outputs": outputs.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>()
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit id from the build env, the runtime env, or `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
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
    fn sidecar_needs_an_output() {
        assert!(write_sidecar(&[], Payload::new("report", json!({}))).is_err());
    }

    #[test]
    fn sidecar_path_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/out/course1.svg"));
        assert_eq!(derived, Path::new("/tmp/out/course1.provenance.json"));
    }

    #[test]
    fn artifact_and_sidecar_are_written() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested/triangles.json");
        let picture = dir.path().join("nested/triangles.svg");
        let payload = Payload::new("arrange", json!({"subset_tolerance": 0.2}));
        let sidecar = write_artifacts(
            &[(artifact.clone(), b"{}".to_vec()), (picture.clone(), b"<svg/>".to_vec())],
            payload,
        )
        .unwrap();
        assert_eq!(sidecar, dir.path().join("nested/triangles.provenance.json"));
        assert!(artifact.exists() && picture.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(parsed["command"], "arrange");
        assert_eq!(parsed["params"]["subset_tolerance"], 0.2);
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["outputs"][1], picture.to_string_lossy().as_ref());
        assert!(parsed["callsite"]["file"].as_str().unwrap().ends_with("provenance.rs"));
    }
}
