//! `mrank all`: every scorer on one graph, one artifact timestamp.

use anyhow::Result;
use missionrank_scoring::{BottomUpReport, CriticalityReport, ImportanceReport};
use serde::Serialize;

use super::{
    ReportOutput, RunContext, ScoreArgs, bottom_up, criticality, importance, load_graph,
    print_artifacts, written,
};
use crate::output::render;

#[derive(Debug, Serialize)]
pub struct AllReports {
    pub bottom_up: BottomUpReport,
    pub criticality: CriticalityReport,
    pub importance: ImportanceReport,
}

/// Execute `mrank all`.
///
/// Stops at the first scorer that fails; nothing is saved in that case.
pub fn run_all(args: &ScoreArgs, ctx: &RunContext) -> Result<()> {
    let graph = load_graph(&args.payload, ctx)?;

    let reports = AllReports {
        bottom_up: bottom_up::score(&graph, ctx)?,
        criticality: criticality::score(&graph, ctx)?,
        importance: importance::score(&graph, ctx)?,
    };

    let mut writer = ctx.artifact_writer()?;
    if let Some(w) = writer.as_mut() {
        bottom_up::save(&reports.bottom_up, w)?;
        criticality::save(&graph, &reports.criticality, w)?;
        importance::save(&reports.importance, w)?;
    }

    let out = ReportOutput {
        content_hash: graph.content_hash(),
        report: &reports,
        artifacts: written(writer.as_ref()),
    };
    render(ctx.output, &out, |out, w| {
        bottom_up::print(&out.report.bottom_up, w)?;
        writeln!(w)?;
        criticality::print(&graph, &out.report.criticality, w)?;
        writeln!(w)?;
        importance::print(&graph, &out.report.importance, w)?;
        print_artifacts(out.artifacts, w)
    })
}
