//! Provenance sidecars for files the CLI writes.
//!
//! `run.json` gets `run.provenance.json` next to it: code revision, library
//! version, the subcommand and its search parameters, where in the CLI the
//! file was written, and the size of each output.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an output file.
pub struct RunInfo {
    /// Subcommand name, e.g. `run` or `batch`.
    pub command: &'static str,
    pub params: Value,
}

#[derive(Debug, Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    trackbot_version: &'static str,
    command: &'a str,
    callsite: Callsite,
    params: &'a Value,
    outputs: Vec<Output>,
}

#[derive(Debug, Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Debug, Serialize)]
struct Output {
    path: String,
    bytes: u64,
}

/// Write the sidecar for an already written `artifact`; returns the sidecar path.
#[track_caller]
pub fn write_sidecar(artifact: &Path, info: &RunInfo) -> Result<PathBuf> {
    let caller = Location::caller();
    let bytes = fs::metadata(artifact)
        .with_context(|| format!("reading size of {}", artifact.display()))?
        .len();
    let sidecar = Sidecar {
        code_rev: current_git_rev(),
        trackbot_version: trackbot::VERSION,
        command: info.command,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        params: &info.params,
        outputs: vec![Output {
            path: artifact.to_string_lossy().into_owned(),
            bytes,
        }],
    };
    let path = sidecar_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// First non-empty of: `GIT_COMMIT` at build time, `GIT_COMMIT` at run time,
/// `git rev-parse HEAD`; "unknown" otherwise.
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .into_iter()
        .chain(std::env::var("GIT_COMMIT").ok())
        .chain(std::iter::once_with(git_head).flatten())
        .find(|rev| !rev.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
