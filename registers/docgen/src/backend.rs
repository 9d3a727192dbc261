// Licensed under the Apache-2.0 license

//! The interface between the exporter and whatever lays the document out.

use crate::error::Result;
use crate::output::{AddrmapInfo, FieldRow, RegisterInfo, RegisterRow};
use serde::Serialize;

/// Receives the document as a stream of records.
///
/// For every map the exporter calls `create_addrmap_info`, then
/// `create_reg_list_info` once per summary row and `dump_reg_list_info` once.
/// For every register it calls `create_register_info`, then
/// `create_fields_list_info` per field and `dump_field_list_info` once.
/// `build_document` is called exactly once, after the last map, and only if
/// nothing failed.
pub trait DocumentBackend {
    fn create_addrmap_info(&mut self, info: &AddrmapInfo) -> Result<()>;

    fn create_reg_list_info(&mut self, row: &RegisterRow, is_reserved: bool) -> Result<()>;

    /// Closes the summary table of the current map.
    fn dump_reg_list_info(&mut self) -> Result<()>;

    fn create_register_info(&mut self, info: &RegisterInfo) -> Result<()>;

    fn create_fields_list_info(&mut self, row: &FieldRow) -> Result<()>;

    /// Closes the field table of the current register.
    fn dump_field_list_info(&mut self) -> Result<()>;

    /// Finalizes the document.
    fn build_document(&mut self) -> Result<()>;
}

/// One backend call, as captured by [`RecordingBackend`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DocumentEvent {
    AddrmapInfo(AddrmapInfo),
    RegListRow { row: RegisterRow, is_reserved: bool },
    DumpRegList,
    RegisterInfo(RegisterInfo),
    FieldRow(FieldRow),
    DumpFieldList,
    Build,
}

/// Keeps every call in order instead of rendering anything.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    pub events: Vec<DocumentEvent>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary rows recorded so far, across all maps.
    pub fn register_rows(&self) -> impl Iterator<Item = &RegisterRow> {
        self.events.iter().filter_map(|e| match e {
            DocumentEvent::RegListRow { row, .. } => Some(row),
            _ => None,
        })
    }

    pub fn field_rows(&self) -> impl Iterator<Item = &FieldRow> {
        self.events.iter().filter_map(|e| match e {
            DocumentEvent::FieldRow(row) => Some(row),
            _ => None,
        })
    }

    pub fn count(&self, event: fn(&DocumentEvent) -> bool) -> usize {
        self.events.iter().filter(|e| event(e)).count()
    }
}

impl DocumentBackend for RecordingBackend {
    fn create_addrmap_info(&mut self, info: &AddrmapInfo) -> Result<()> {
        self.events.push(DocumentEvent::AddrmapInfo(info.clone()));
        Ok(())
    }

    fn create_reg_list_info(&mut self, row: &RegisterRow, is_reserved: bool) -> Result<()> {
        self.events.push(DocumentEvent::RegListRow {
            row: row.clone(),
            is_reserved,
        });
        Ok(())
    }

    fn dump_reg_list_info(&mut self) -> Result<()> {
        self.events.push(DocumentEvent::DumpRegList);
        Ok(())
    }

    fn create_register_info(&mut self, info: &RegisterInfo) -> Result<()> {
        self.events.push(DocumentEvent::RegisterInfo(info.clone()));
        Ok(())
    }

    fn create_fields_list_info(&mut self, row: &FieldRow) -> Result<()> {
        self.events.push(DocumentEvent::FieldRow(row.clone()));
        Ok(())
    }

    fn dump_field_list_info(&mut self) -> Result<()> {
        self.events.push(DocumentEvent::DumpFieldList);
        Ok(())
    }

    fn build_document(&mut self) -> Result<()> {
        self.events.push(DocumentEvent::Build);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_tag() {
        let mut backend = RecordingBackend::new();
        backend
            .create_reg_list_info(&RegisterRow::reserved("32'h0000_0004".into()), true)
            .unwrap();
        backend.dump_reg_list_info().unwrap();
        backend.build_document().unwrap();

        let json = serde_json::to_value(&backend.events).unwrap();
        assert_eq!(json[0]["event"], "reg_list_row");
        assert_eq!(json[0]["is_reserved"], true);
        assert_eq!(json[0]["row"]["identifier"], "-");
        assert_eq!(json[1]["event"], "dump_reg_list");
        assert_eq!(json[2]["event"], "build");
        assert_eq!(backend.count(|e| matches!(e, DocumentEvent::Build)), 1);
        assert_eq!(backend.register_rows().count(), 1);
    }
}
