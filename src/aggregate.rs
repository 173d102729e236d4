use crate::config::Settings;
use crate::decode::read_text;
use crate::render::OutputDocument;
use crate::types::{FileEntry, RunSummary};
use crate::walk::collect_files;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

/// One full run: walk the root, then write a fresh output file.
pub fn run(settings: &Settings) -> Result<RunSummary> {
    if !settings.root.is_dir() {
        bail!("scan root is not a directory: {}", settings.root.display());
    }

    // File::create truncates, so stale output never survives
    let file = File::create(&settings.output)
        .with_context(|| format!("cannot create {}", settings.output.display()))?;
    let files = collect_files(settings, Some(&settings.output))?;
    tracing::debug!("Collected {} matching file(s)", files.len());

    let mut summary = write_document(BufWriter::new(file), &files, settings)
        .with_context(|| format!("failed writing {}", settings.output.display()))?;
    summary.output = settings.output.clone();
    Ok(summary)
}

/// Render `files` into `out`, reading each file only when its block is written.
pub fn write_document<W: Write>(
    out: W,
    files: &[FileEntry],
    settings: &Settings,
) -> std::io::Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut doc = OutputDocument::new(out);

    if settings.structure {
        doc.write_structure(files)?;
    }
    doc.begin_contents()?;

    for file in files {
        match read_text(&file.abs_path, settings.encoding, settings.fallback_encoding) {
            Ok(decoded) => {
                if decoded.used_fallback(settings.encoding) {
                    tracing::debug!(
                        "Decoded {} as {}",
                        file.rel_path,
                        decoded.encoding.name()
                    );
                    summary.fallback_decoded += 1;
                }
                doc.write_file_block(&file.rel_path, &decoded.text)?;
            }
            Err(e) => {
                tracing::warn!("{}: {}", file.rel_path, e);
                summary.unreadable += 1;
                doc.write_error_block(&file.rel_path, &e)?;
            }
        }
        summary.files_written += 1;
    }

    doc.finish()?;
    Ok(summary)
}
