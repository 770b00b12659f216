//! `mrank importance`: PageRank importance of data per mission.

use std::io::{self, Write};

use anyhow::Result;
use missionrank_core::MissionGraph;
use missionrank_scoring::{ImportanceReport, importance};

use super::{ReportOutput, RunContext, ScoreArgs, fail, load_graph, print_artifacts, written};
use crate::artifacts::ArtifactWriter;
use crate::output::{kv, render, section};

/// Artifact prefix shared by the JSON map and the CSV matrix.
pub const MISSIONS_PREFIX: &str = "pagerank_analysis_missions";

/// Entries shown per mission in human output.
const TOP_N: usize = 5;

/// Execute `mrank importance`.
pub fn run_importance(args: &ScoreArgs, ctx: &RunContext) -> Result<()> {
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
        print(&graph, out.report, w)?;
        print_artifacts(out.artifacts, w)
    })
}

/// Run the propagator, rendering any failure.
pub fn score(graph: &MissionGraph, ctx: &RunContext) -> Result<ImportanceReport> {
    importance(graph, &ctx.config).map_err(|err| fail(ctx.output, err))
}

/// Write the per-mission JSON map and the labelled CSV matrix.
pub fn save(report: &ImportanceReport, writer: &mut ArtifactWriter) -> Result<()> {
    writer.write_json(MISSIONS_PREFIX, &report.per_mission)?;
    writer.write_matrix_csv(
        MISSIONS_PREFIX,
        &report.mission_labels,
        &report.data_labels,
        &report.matrix,
    )?;
    Ok(())
}

/// Human summary: the top data assets of each mission.
pub fn print(
    graph: &MissionGraph,
    report: &ImportanceReport,
    w: &mut dyn Write,
) -> io::Result<()> {
    section(w, "Data importance per mission")?;
    kv(w, "missions", graph.mission_count().to_string())?;
    kv(
        w,
        "pagerank",
        format!(
            "{} iterations{}",
            report.pagerank.iterations,
            if report.pagerank.converged {
                ""
            } else {
                " (not converged)"
            }
        ),
    )?;

    for mission in graph.missions() {
        writeln!(w)?;
        writeln!(w, "{}", mission.label)?;

        let Some(scores) = report.per_mission.get(&mission.id) else {
            continue;
        };
        if scores.is_empty() {
            writeln!(w, "  (no reachable data)")?;
            continue;
        }

        let mut ranked: Vec<(&String, f64)> = scores.iter().map(|(id, s)| (id, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        for (id, score) in ranked.iter().take(TOP_N) {
            let label = graph
                .data_column(id)
                .and_then(|col| graph.data().get(col))
                .map_or(id.as_str(), |d| d.label.as_str());
            writeln!(w, "  {label:<24} {score:>8.4}")?;
        }
        if ranked.len() > TOP_N {
            writeln!(w, "  ... {} more", ranked.len() - TOP_N)?;
        }
    }
    Ok(())
}
