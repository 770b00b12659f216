//! Command handlers for `mrank`.
//!
//! Each scorer has a module with a `run_*` entry point plus `save_*` and
//! `print_*` helpers so `mrank all` can reuse them on one graph.

pub mod all;
pub mod bottom_up;
pub mod criticality;
pub mod importance;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use missionrank_core::{GraphPayload, MissionGraph, ScoringConfig, ScoringError};
use serde::Serialize;
use tracing::{info, warn};

use crate::artifacts::ArtifactWriter;
use crate::output::{CliError, OutputMode, kv, render_error};

/// Arguments shared by every scoring subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// JSON payload with `Mission`, `OperationalData`, `MissionHierarchy`
    /// and `Mission_OperationalData` collections.
    pub payload: PathBuf,
}

/// Settings resolved once in `main` and passed to every handler.
#[derive(Debug)]
pub struct RunContext {
    pub config: ScoringConfig,
    pub output: OutputMode,
}

impl RunContext {
    /// Artifact writer for this run, or `None` when saving is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created.
    pub fn artifact_writer(&self) -> Result<Option<ArtifactWriter>> {
        if !self.config.output.save {
            return Ok(None);
        }
        ArtifactWriter::new(&self.config.output.dir).map(Some)
    }
}

/// JSON envelope printed by `--json`.
#[derive(Debug, Serialize)]
pub struct ReportOutput<'a, T: Serialize> {
    pub content_hash: &'a str,
    pub report: &'a T,
    pub artifacts: &'a [PathBuf],
}

/// Read the payload and build the graph, reporting failures with their code.
///
/// # Errors
///
/// Returns the rendered [`ScoringError`] if the payload is unreadable or
/// invalid.
pub fn load_graph(path: &Path, ctx: &RunContext) -> Result<MissionGraph> {
    let payload = GraphPayload::from_path(path).map_err(|err| fail(ctx.output, err))?;
    let graph =
        MissionGraph::build(&payload, &ctx.config.limits).map_err(|err| fail(ctx.output, err))?;
    info!(
        payload = %path.display(),
        missions = graph.mission_count(),
        data = graph.data_count(),
        "graph loaded"
    );
    Ok(graph)
}

/// Render a scoring failure to stderr and convert it for `main`.
pub fn fail(mode: OutputMode, err: ScoringError) -> anyhow::Error {
    if let Err(render_err) = render_error(mode, &CliError::from(&err)) {
        warn!(%render_err, "failed to render error");
    }
    anyhow::Error::new(err)
}

/// Artifact paths written so far, empty when saving is disabled.
#[must_use]
pub fn written(writer: Option<&ArtifactWriter>) -> &[PathBuf] {
    match writer {
        Some(writer) => writer.written(),
        None => &[],
    }
}

/// List saved artifact paths, if any.
pub fn print_artifacts(paths: &[PathBuf], w: &mut dyn Write) -> io::Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    for path in paths {
        kv(w, "saved", path.display().to_string())?;
    }
    Ok(())
}
