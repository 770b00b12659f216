//! Result artifacts: timestamped CSV and JSON files in the output directory.
//!
//! File names follow `<prefix>_<timestamp>.<ext>` with a local timestamp of
//! the form `2024-05-01_13-45-10`. Every artifact of one command run shares
//! the same timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use missionrank_core::UsageMatrix;
use serde::Serialize;
use tracing::{debug, info};

/// `strftime` pattern for artifact timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Build `<prefix>_<timestamp>.<ext>`.
#[must_use]
pub fn generate_filename(prefix: &str, ext: &str, at: &DateTime<Local>) -> String {
    format!("{prefix}_{}.{ext}", at.format(TIMESTAMP_FORMAT))
}

/// Writes artifacts for one command run.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
    at: DateTime<Local>,
    written: Vec<PathBuf>,
}

impl ArtifactWriter {
    /// Create the output directory if needed and fix the run timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: &Path) -> Result<Self> {
        Self::with_timestamp(dir, Local::now())
    }

    /// Like [`ArtifactWriter::new`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_timestamp(dir: &Path, at: DateTime<Local>) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            at,
            written: Vec::new(),
        })
    }

    /// Paths written so far, in order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Write a labelled matrix as CSV.
    ///
    /// The header row is an empty cell followed by the column labels; each
    /// following row starts with its row label.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_matrix_csv(
        &mut self,
        prefix: &str,
        row_labels: &[String],
        col_labels: &[String],
        matrix: &UsageMatrix,
    ) -> Result<PathBuf> {
        let body = matrix_csv(row_labels, col_labels, matrix);
        self.write(prefix, "csv", body.as_bytes())
    }

    /// Write any serializable value as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json<T: Serialize>(&mut self, prefix: &str, value: &T) -> Result<PathBuf> {
        let mut body = serde_json::to_vec_pretty(value).context("Failed to serialize artifact")?;
        body.push(b'\n');
        self.write(prefix, "json", &body)
    }

    fn write(&mut self, prefix: &str, ext: &str, body: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(generate_filename(prefix, ext, &self.at));
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), bytes = body.len(), "artifact written");
        info!(path = %path.display(), "saved");
        self.written.push(path.clone());
        Ok(path)
    }
}

/// Render a labelled matrix as CSV text.
#[must_use]
pub fn matrix_csv(row_labels: &[String], col_labels: &[String], matrix: &UsageMatrix) -> String {
    let mut out = String::new();

    for label in col_labels {
        out.push(',');
        out.push_str(&csv_field(label));
    }
    out.push('\n');

    for (label, row) in row_labels.iter().zip(matrix.iter_rows()) {
        out.push_str(&csv_field(label));
        for value in row {
            out.push(',');
            out.push_str(&format_value(*value));
        }
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Whole numbers keep one decimal (`100.0`), others print in full.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
