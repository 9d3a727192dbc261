// Licensed under the Apache-2.0 license

//! Export entry points.
//!
//! Each top-level map is walked in post order, so nested maps are documented
//! before the map that contains them. Every map produces two passes of
//! backend calls:
//!
//! - a summary table of its registers and reserved holes;
//! - one detail section per register, followed by its field table.
//!
//! `build_document` is called once, after every map succeeded. An error
//! anywhere stops the export before the document is built.

mod walk;

use crate::backend::DocumentBackend;
use crate::config::ExportOptions;
use crate::document::{DocumentFormat, DocumentWriter};
use crate::error::{ExportError, Result};
use crate::model::AddrMap;
use log::info;
use std::path::Path;
use walk::Walker;

/// Documents `roots` into a file at `output`.
///
/// Nothing is written at `output` unless the whole export succeeds.
pub fn export(
    roots: &[AddrMap],
    output: &Path,
    format: DocumentFormat,
    options: &ExportOptions,
) -> Result<()> {
    let mut writer = DocumentWriter::create(output, format, options.page_decorations.clone());
    export_with_backend(roots, &mut writer, options)
}

/// Documents `roots` through any backend.
pub fn export_with_backend<B: DocumentBackend + ?Sized>(
    roots: &[AddrMap],
    backend: &mut B,
    options: &ExportOptions,
) -> Result<()> {
    if roots.is_empty() {
        return Err(ExportError::Config(
            "no top-level address map to export".to_string(),
        ));
    }

    let mut walker = Walker::new(backend, options);
    for (idx, root) in roots.iter().enumerate() {
        info!("Exporting {} ({}/{})", root.inst_name, idx + 1, roots.len());
        walker.walk_root(root, idx + 1)?;
    }
    let maps = walker.finish()?;
    info!("Exported {maps} address map(s)");
    Ok(())
}
