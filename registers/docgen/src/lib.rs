// Licensed under the Apache-2.0 license

//! Register-map documentation exporter.
//!
//! This crate turns an elaborated SystemRDL register model into reference
//! documentation: one summary table per address map, listing every register
//! and the reserved holes between them, followed by a field table for each
//! register.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use mcu_registers_docgen::{export, DocumentFormat, ExportOptions, FieldOrder, Model};
//!
//! let model = Model::from_file(Path::new("mcu.json")).unwrap();
//! let options = ExportOptions::new()
//!     .field_order(FieldOrder::MsbFirst)
//!     .on_first_page(|page| format!("# MCU registers\n\n{}", page.generated));
//! export(&model.roots, Path::new("mcu.md"), DocumentFormat::Markdown, &options).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`format`]: Verilog-style hex literals (`32'h0000_1000`)
//! - [`access`]: Field access mnemonics (`RW1C`, `RO`, ...)
//! - [`reconcile`]: Summary rows and reserved address ranges
//! - [`context`]: Per-map addressing ([`MapContext`])
//! - [`model`]: The register model and property lookup ([`Component`])
//! - [`config`]: Export options ([`ExportOptions`])
//! - [`output`]: Row records handed to a backend
//! - [`backend`]: The backend interface ([`DocumentBackend`])
//! - [`document`]: Markdown/JSON file backend ([`DocumentWriter`])

pub mod access;
pub mod backend;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod format;
pub mod model;
pub mod output;
pub mod reconcile;

mod export;

// Re-export main public API
pub use backend::{DocumentBackend, DocumentEvent, RecordingBackend};
pub use config::{ExportOptions, FieldOrder, PageContext, PageDecorations};
pub use context::MapContext;
pub use document::{DocumentFormat, DocumentWriter};
pub use error::{ExportError, Result};
pub use export::{export, export_with_backend};
pub use format::format_number;
pub use model::{AddrMap, Component, Model};
