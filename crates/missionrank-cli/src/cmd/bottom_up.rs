//! `mrank bottom-up`: usage percentage of every data asset per mission.

use std::io::{self, Write};

use anyhow::Result;
use missionrank_core::MissionGraph;
use missionrank_scoring::{BottomUpReport, bottom_up};

use super::{ReportOutput, RunContext, ScoreArgs, fail, load_graph, print_artifacts, written};
use crate::artifacts::ArtifactWriter;
use crate::output::{kv, render, section};

/// Artifact prefix for the usage matrix CSV.
pub const MATRIX_PREFIX: &str = "matrix_bottom_up";

/// Execute `mrank bottom-up`.
pub fn run_bottom_up(args: &ScoreArgs, ctx: &RunContext) -> Result<()> {
    let graph = load_graph(&args.payload, ctx)?;
    let report = score(&graph, ctx)?;

    let mut writer = ctx.artifact_writer()?;
    if let Some(w) = writer.as_mut() {
        save(&report, w)?;
    }

    let out = ReportOutput {
        content_hash: graph.content_hash(),
        report: &report,
        artifacts: written(writer.as_ref()),
    };
    render(ctx.output, &out, |out, w| {
        print(out.report, w)?;
        print_artifacts(out.artifacts, w)
    })
}

/// Run the aggregator, rendering any failure.
pub fn score(graph: &MissionGraph, ctx: &RunContext) -> Result<BottomUpReport> {
    bottom_up(graph, &ctx.config.limits).map_err(|err| fail(ctx.output, err))
}

/// Write the matrix CSV.
pub fn save(report: &BottomUpReport, writer: &mut ArtifactWriter) -> Result<()> {
    writer.write_matrix_csv(
        MATRIX_PREFIX,
        &report.mission_labels,
        &report.data_labels,
        &report.matrix,
    )?;
    Ok(())
}

/// Human table: one row per mission, one column per data asset.
pub fn print(report: &BottomUpReport, w: &mut dyn Write) -> io::Result<()> {
    section(w, "Bottom-up usage (%)")?;
    kv(w, "missions", report.mission_labels.len().to_string())?;
    kv(w, "data", report.data_labels.len().to_string())?;
    writeln!(w)?;

    let label_width = report
        .mission_labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("mission".len());

    write!(w, "{:<label_width$}", "mission")?;
    for label in &report.data_labels {
        write!(w, "  {label:>8}")?;
    }
    writeln!(w)?;

    for (label, row) in report.mission_labels.iter().zip(report.matrix.iter_rows()) {
        write!(w, "{label:<label_width$}")?;
        for value in row {
            write!(w, "  {value:>8.1}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}
