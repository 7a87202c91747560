//! Rendering comparison results.

use gitcmp_git::{ObjectId, RefDiff, RefEntry};
use serde::Serialize;
use std::io::{self, Write};

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// One line per difference.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    left: &'a str,
    right: &'a str,
    identical: bool,
    #[serde(flatten)]
    diff: &'a RefDiff,
}

/// Writes one line per mismatch, then the refs only in `left`, then those
/// only in `right`.
pub fn write_text<W: Write>(out: &mut W, left: &str, right: &str, diff: &RefDiff) -> io::Result<()> {
    for mismatch in &diff.mismatched {
        write_mismatch(out, &mismatch.name, &mismatch.left, &mismatch.right)?;
    }
    write_only(out, left, &diff.only_left)?;
    write_only(out, right, &diff.only_right)?;
    Ok(())
}

fn write_mismatch<W: Write>(out: &mut W, name: &str, left: &ObjectId, right: &ObjectId) -> io::Result<()> {
    writeln!(out, "{name} differs: {left} vs. {right}")
}

fn write_only<W: Write>(out: &mut W, repo: &str, entries: &[RefEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "Only in {repo}: {}", entry.name)?;
    }
    Ok(())
}

/// Writes the diff as a JSON object, followed by a newline.
pub fn write_json<W: Write>(out: &mut W, left: &str, right: &str, diff: &RefDiff) -> io::Result<()> {
    let report = JsonReport {
        left,
        right,
        identical: diff.is_identical(),
        diff,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

/// Writes the report in the requested format.
pub fn write<W: Write>(out: &mut W, format: Format, left: &str, right: &str, diff: &RefDiff) -> io::Result<()> {
    match format {
        Format::Text => write_text(out, left, right, diff),
        Format::Json => write_json(out, left, right, diff),
    }
}
