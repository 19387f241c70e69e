//! The export action: pick the code region, render it, save it.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::Options;
use crate::document::LatexDocument;
use crate::error::{Error, Result};
use crate::listing::{AddressRange, ListingSource};

/// What the user asked to export
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// Explicit selection, takes precedence over the cursor
    pub selection: Option<AddressRange>,
    /// Cursor address; the enclosing function is exported
    pub cursor: Option<u64>,
    /// Destination file, `None` when the user cancelled
    pub destination: Option<PathBuf>,
}

/// Summary of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub range: AddressRange,
    pub lines: usize,
}

/// Decide which address range to export
pub fn resolve_range(source: &dyn ListingSource, request: &ExportRequest) -> Result<AddressRange> {
    if let Some(selection) = request.selection {
        return Ok(selection);
    }

    match request.cursor {
        Some(addr) => {
            log::info!("no selection...");
            let func = source
                .function_containing(addr)
                .ok_or(Error::NoCodeRegion(addr))?;
            if let Some(name) = &func.name {
                log::debug!("exporting function {}", name);
            }
            Ok(func.range)
        }
        // Nothing picked: take the whole listing
        None => Ok(source.bounds().unwrap_or(AddressRange::new(0, 0))),
    }
}

/// Run the export and write the document to the requested file
pub fn run(source: &dyn ListingSource, request: &ExportRequest, opts: Options) -> Result<ExportSummary> {
    let range = resolve_range(source, request)?;
    log::debug!("range {:#x}..{:#x}", range.start, range.end);

    let lines = source.lines_for(&range)?;

    let path = request.destination.as_deref().ok_or(Error::NoDestination)?;
    let written = write_document(path, &lines, opts)?;

    log::info!("Saved to {}...", path.display());
    Ok(ExportSummary {
        path: path.to_path_buf(),
        range,
        lines: written,
    })
}

fn write_document(path: &Path, lines: &[Vec<u8>], opts: Options) -> Result<usize> {
    let file = File::create(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = LatexDocument::begin(opts, BufWriter::new(file))?;
    doc.write_lines(lines)?;
    let written = doc.lines_written();
    doc.finish()?;
    Ok(written)
}
