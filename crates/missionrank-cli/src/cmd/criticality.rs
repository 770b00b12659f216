//! `mrank criticality`: structural criticality of each data asset.

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::Result;
use missionrank_core::MissionGraph;
use missionrank_scoring::{CriticalityReport, criticality};
use serde::Serialize;

use super::{ReportOutput, RunContext, ScoreArgs, fail, load_graph, print_artifacts, written};
use crate::artifacts::ArtifactWriter;
use crate::output::{kv, render, section};

/// Artifact prefix for the label-keyed score file.
pub const SCORES_PREFIX: &str = "scores_bfs_dfs";

/// Saved score file, keyed by data label.
#[derive(Debug, Serialize)]
pub struct LabelledScores {
    pub normalized_scores: BTreeMap<String, f64>,
    pub non_normalized_scores: BTreeMap<String, f64>,
}

impl LabelledScores {
    #[must_use]
    pub fn new(graph: &MissionGraph, report: &CriticalityReport) -> Self {
        Self {
            normalized_scores: CriticalityReport::by_label(graph, &report.normalized),
            non_normalized_scores: CriticalityReport::by_label(graph, &report.raw),
        }
    }
}

/// Execute `mrank criticality`.
pub fn run_criticality(args: &ScoreArgs, ctx: &RunContext) -> Result<()> {
    let graph = load_graph(&args.payload, ctx)?;
    let report = score(&graph, ctx)?;

    let mut writer = ctx.artifact_writer()?;
    if let Some(w) = writer.as_mut() {
        save(&graph, &report, w)?;
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

/// Run the scorer, rendering any failure.
pub fn score(graph: &MissionGraph, ctx: &RunContext) -> Result<CriticalityReport> {
    criticality(graph, &ctx.config.limits).map_err(|err| fail(ctx.output, err))
}

/// Write `scores_bfs_dfs_<ts>.json`.
pub fn save(
    graph: &MissionGraph,
    report: &CriticalityReport,
    writer: &mut ArtifactWriter,
) -> Result<()> {
    writer.write_json(SCORES_PREFIX, &LabelledScores::new(graph, report))?;
    Ok(())
}

/// Human table, most critical first.
pub fn print(
    graph: &MissionGraph,
    report: &CriticalityReport,
    w: &mut dyn Write,
) -> io::Result<()> {
    section(w, "Data criticality")?;
    kv(w, "data", graph.data_count().to_string())?;
    writeln!(w)?;

    let mut rows: Vec<(&str, &str, f64)> = graph
        .data()
        .iter()
        .filter_map(|d| {
            report
                .normalized
                .get(&d.id)
                .map(|score| (d.id.as_str(), d.label.as_str(), *score))
        })
        .collect();
    rows.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    writeln!(
        w,
        "{:<24} {:>10} {:>10} {:>6} {:>8}",
        "data", "score", "raw", "depth", "breadth"
    )?;
    for (id, label, normalized) in rows {
        writeln!(
            w,
            "{:<24} {:>10.3} {:>10.3} {:>6} {:>8}",
            label,
            normalized,
            report.raw.get(id).copied().unwrap_or_default(),
            report.depth.get(id).copied().unwrap_or_default(),
            report.breadth.get(id).copied().unwrap_or_default(),
        )?;
    }
    Ok(())
}
