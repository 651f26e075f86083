//! Artifact Writer
//!
//! Renders one batch into one text artifact. Member read failures are
//! written inline and never abort the artifact; a failure to create or write
//! the artifact itself is returned as [`ArtifactOutcome::Failed`] and never
//! aborts the run.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::batch::Batch;
use crate::collector::BucketEntry;

const DELIMITER_WIDTH: usize = 50;

/// A member whose content could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberFailure {
    pub relative: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactOutcome {
    Written {
        artifact: String,
        path: PathBuf,
        members: usize,
        failures: Vec<MemberFailure>,
    },
    Failed {
        artifact: String,
        path: PathBuf,
        message: String,
    },
}

impl ArtifactOutcome {
    pub fn artifact(&self) -> &str {
        match self {
            Self::Written { artifact, .. } | Self::Failed { artifact, .. } => artifact,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    pub fn failures(&self) -> &[MemberFailure] {
        match self {
            Self::Written { failures, .. } => failures,
            Self::Failed { .. } => &[],
        }
    }
}

fn delimiter() -> String {
    "=".repeat(DELIMITER_WIDTH)
}

/// Write the two-line header announcing the artifact and its member count
fn write_header<W: Write>(out: &mut W, artifact: &str, count: usize) -> io::Result<()> {
    writeln!(out, "=== CONTEÚDO PARCIAL: {} ===", artifact)?;
    writeln!(out, "=== CONTÉM {} ARQUIVOS ===", count)?;
    writeln!(out)
}

/// Write one member section. A read failure becomes an inline marker and is
/// returned; only errors from `out` propagate.
fn write_member<W: Write>(out: &mut W, entry: &BucketEntry) -> io::Result<Option<MemberFailure>> {
    match fs::read_to_string(&entry.path) {
        Ok(content) => {
            let line = delimiter();
            write!(out, "\n{}\n", line)?;
            writeln!(out, "ARQUIVO: {}", entry.relative)?;
            writeln!(out, "{}", line)?;
            out.write_all(content.as_bytes())?;
            writeln!(out)?;
            Ok(None)
        }
        Err(e) => {
            write!(out, "\n[ERRO AO LER {}: {}]\n", entry.relative, e)?;
            Ok(Some(MemberFailure {
                relative: entry.relative.clone(),
                message: e.to_string(),
            }))
        }
    }
}

/// Render a whole batch into `out`, returning the members that could not be read
pub fn render_batch<W: Write>(out: &mut W, batch: &Batch<'_>) -> io::Result<Vec<MemberFailure>> {
    write_header(out, &batch.artifact_name, batch.members.len())?;

    let mut failures = Vec::new();
    for entry in batch.members {
        if let Some(failure) = write_member(out, entry)? {
            failures.push(failure);
        }
    }
    Ok(failures)
}

fn write_artifact(path: &Path, batch: &Batch<'_>) -> io::Result<Vec<MemberFailure>> {
    let mut out = BufWriter::new(File::create(path)?);
    let failures = render_batch(&mut out, batch)?;
    out.flush()?;
    Ok(failures)
}

/// Write `batch` to `<out_dir>/<artifact_name>`, overwriting any previous file
pub fn write_batch(out_dir: &Path, batch: &Batch<'_>) -> ArtifactOutcome {
    let path = out_dir.join(&batch.artifact_name);
    match write_artifact(&path, batch) {
        Ok(failures) => ArtifactOutcome::Written {
            artifact: batch.artifact_name.clone(),
            path,
            members: batch.members.len(),
            failures,
        },
        Err(e) => ArtifactOutcome::Failed {
            artifact: batch.artifact_name.clone(),
            path,
            message: e.to_string(),
        },
    }
}
