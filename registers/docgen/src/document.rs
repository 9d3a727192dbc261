// Licensed under the Apache-2.0 license

//! File-backed [`DocumentBackend`] producing Markdown or JSON.
//!
//! The writer buffers the whole document and only touches the file system in
//! `build_document`, where the rendered text is written to a temporary file
//! next to the target and then renamed over it. An export that fails part
//! way leaves no output file behind.

use crate::backend::DocumentBackend;
use crate::config::{PageContext, PageDecorations};
use crate::error::{ExportError, Result};
use crate::output::{AddrmapInfo, FieldRow, RegisterInfo, RegisterRow};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};

/// Output format of a [`DocumentWriter`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Serialize)]
struct RegisterSection {
    info: RegisterInfo,
    fields: Vec<FieldRow>,
}

#[derive(Debug, Serialize)]
struct MapSection {
    info: AddrmapInfo,
    rows: Vec<RegisterRow>,
    registers: Vec<RegisterSection>,
}

#[derive(Debug, Serialize)]
struct Document {
    generated: String,
    maps: Vec<MapSection>,
}

/// Which table is currently receiving rows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OpenTable {
    None,
    RegisterList,
    Fields,
}

/// Writes the exported document to a file.
pub struct DocumentWriter {
    path: PathBuf,
    format: DocumentFormat,
    decorations: PageDecorations,
    document: Document,
    open: OpenTable,
    built: bool,
}

impl DocumentWriter {
    /// Prepares a document for `path`. The generation timestamp is taken
    /// here, once.
    pub fn create(path: &Path, format: DocumentFormat, decorations: PageDecorations) -> Self {
        let generated = chrono::Local::now()
            .format("%m-%d-%Y %H:%M:%S")
            .to_string();
        Self {
            path: path.to_path_buf(),
            format,
            decorations,
            document: Document {
                generated,
                maps: Vec::new(),
            },
            open: OpenTable::None,
            built: false,
        }
    }

    /// Replaces the generation timestamp.
    pub fn with_timestamp(mut self, generated: impl Into<String>) -> Self {
        self.document.generated = generated.into();
        self
    }

    fn expect_open(&self, table: OpenTable, call: &str) -> Result<()> {
        if self.built {
            return Err(ExportError::Backend(format!(
                "{call} after the document was built"
            )));
        }
        if self.open != table {
            return Err(ExportError::Backend(format!(
                "{call} while {:?} table is open",
                self.open
            )));
        }
        Ok(())
    }

    fn current_map(&mut self, call: &str) -> Result<&mut MapSection> {
        self.document
            .maps
            .last_mut()
            .ok_or_else(|| ExportError::Backend(format!("{call} before any address map")))
    }

    /// Renders the buffered document in the configured format.
    pub fn render(&self) -> Result<String> {
        match self.format {
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(&self.document)?),
            DocumentFormat::Markdown => Ok(self.render_markdown()),
        }
    }

    fn render_markdown(&self) -> String {
        let mut out = String::new();
        let generated = self.document.generated.as_str();

        for (i, map) in self.document.maps.iter().enumerate() {
            let title = format!("{} {}", map.info.section, map.info.name);
            let page = PageContext {
                page: i + 1,
                title: &title,
                generated,
            };
            let decoration = if i == 0 {
                self.decorations.first_page.as_ref()
            } else {
                out.push_str("---\n\n");
                self.decorations.later_pages.as_ref()
            };
            if let Some(decorate) = decoration {
                writeln!(out, "{}\n", decorate(&page)).unwrap();
            }
            render_map(&mut out, &title, map);
        }

        writeln!(out, "_Generated {generated}_").unwrap();
        out
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn render_map(out: &mut String, title: &str, map: &MapSection) {
    let info = &map.info;
    writeln!(out, "## {}\n", cell(title)).unwrap();
    if !info.description.is_empty() {
        writeln!(out, "{}\n", info.description).unwrap();
    }
    writeln!(out, "| Base address | Size | Units | Endianness |").unwrap();
    writeln!(out, "|---|---|---|---|").unwrap();
    writeln!(
        out,
        "| {} | {} | {} | {} |\n",
        info.base_address, info.size, info.units, info.endianness
    )
    .unwrap();

    writeln!(out, "### Address map\n").unwrap();
    writeln!(out, "| Offset | Identifier | Name |").unwrap();
    writeln!(out, "|---|---|---|").unwrap();
    for row in &map.rows {
        if row.is_reserved() {
            writeln!(out, "| _{}_ | - | _reserved_ |", row.offset).unwrap();
        } else {
            writeln!(
                out,
                "| {} | {} | {} |",
                row.offset,
                cell(&row.identifier),
                cell(&row.name)
            )
            .unwrap();
        }
    }
    writeln!(out).unwrap();

    for reg in &map.registers {
        render_register(out, reg);
    }
}

fn render_register(out: &mut String, reg: &RegisterSection) {
    let info = &reg.info;
    writeln!(out, "### {} {}\n", info.section, cell(&info.identifier)).unwrap();
    writeln!(out, "**{}**\n", cell(&info.name)).unwrap();
    if !info.description.is_empty() {
        writeln!(out, "{}\n", info.description).unwrap();
    }
    writeln!(
        out,
        "| Absolute address | Offset | Access | Reset | Size ({}) |",
        info.units
    )
    .unwrap();
    writeln!(out, "|---|---|---|---|---|").unwrap();
    writeln!(
        out,
        "| {} | {} | {} | {} | {} |\n",
        info.absolute_address,
        info.offset,
        cell(&info.access),
        info.reset,
        info.size
    )
    .unwrap();

    if reg.fields.is_empty() {
        return;
    }
    writeln!(out, "| Bits | Identifier | Access | Reset | Name | Description |").unwrap();
    writeln!(out, "|---|---|---|---|---|---|").unwrap();
    for field in &reg.fields {
        let mut identifier = cell(&field.identifier);
        if field.reserved {
            identifier = format!("_{identifier}_");
        }
        if let Some(encoding) = &field.encoding_name {
            write!(identifier, "<br/>{}", cell(encoding)).unwrap();
        }
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            field.bits,
            identifier,
            field.access,
            field.reset,
            cell(&field.name),
            cell(&field.description)
        )
        .unwrap();
    }
    writeln!(out).unwrap();

    for field in reg.fields.iter().filter(|f| !f.encoding.is_empty()) {
        writeln!(
            out,
            "**{}** encoding `{}`\n",
            cell(&field.identifier),
            field.encoding_name.as_deref().unwrap_or_default()
        )
        .unwrap();
        writeln!(out, "| Name | Value | Description |").unwrap();
        writeln!(out, "|---|---|---|").unwrap();
        for value in &field.encoding {
            writeln!(
                out,
                "| {} | {} | {} |",
                cell(&value.name),
                value.value,
                cell(&value.description)
            )
            .unwrap();
        }
        writeln!(out).unwrap();
    }
}

impl DocumentBackend for DocumentWriter {
    fn create_addrmap_info(&mut self, info: &AddrmapInfo) -> Result<()> {
        self.expect_open(OpenTable::None, "create_addrmap_info")?;
        self.document.maps.push(MapSection {
            info: info.clone(),
            rows: Vec::new(),
            registers: Vec::new(),
        });
        self.open = OpenTable::RegisterList;
        Ok(())
    }

    fn create_reg_list_info(&mut self, row: &RegisterRow, is_reserved: bool) -> Result<()> {
        self.expect_open(OpenTable::RegisterList, "create_reg_list_info")?;
        if is_reserved != row.is_reserved() {
            return Err(ExportError::Backend(format!(
                "row {} flagged reserved={is_reserved} but is {:?}",
                row.offset, row.kind
            )));
        }
        self.current_map("create_reg_list_info")?.rows.push(row.clone());
        Ok(())
    }

    fn dump_reg_list_info(&mut self) -> Result<()> {
        self.expect_open(OpenTable::RegisterList, "dump_reg_list_info")?;
        self.open = OpenTable::None;
        Ok(())
    }

    fn create_register_info(&mut self, info: &RegisterInfo) -> Result<()> {
        self.expect_open(OpenTable::None, "create_register_info")?;
        self.current_map("create_register_info")?
            .registers
            .push(RegisterSection {
                info: info.clone(),
                fields: Vec::new(),
            });
        self.open = OpenTable::Fields;
        Ok(())
    }

    fn create_fields_list_info(&mut self, row: &FieldRow) -> Result<()> {
        self.expect_open(OpenTable::Fields, "create_fields_list_info")?;
        self.current_map("create_fields_list_info")?
            .registers
            .last_mut()
            .ok_or_else(|| ExportError::Backend("field row without a register".into()))?
            .fields
            .push(row.clone());
        Ok(())
    }

    fn dump_field_list_info(&mut self) -> Result<()> {
        self.expect_open(OpenTable::Fields, "dump_field_list_info")?;
        self.open = OpenTable::None;
        Ok(())
    }

    fn build_document(&mut self) -> Result<()> {
        self.expect_open(OpenTable::None, "build_document")?;
        let rendered = self.render()?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(rendered.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| ExportError::Io(e.error))?;
        self.built = true;
        log::info!("Document written to {}", self.path.display());
        Ok(())
    }
}
