// Licensed under the Apache-2.0 license

//! Records handed to the document backend.
//!
//! Every value is already formatted; a backend only lays the strings out.
//!
//! ```text
//! AddrmapInfo          → map heading
//! RegisterRow[]        → address-map summary table (one dump)
//! per register:
//!   RegisterInfo       → register heading
//!   FieldRow[]         → field table (one dump)
//! ```

use crate::access::AccessMnemonic;
use crate::context::Endianness;
use serde::Serialize;

/// Heading of one address map.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AddrmapInfo {
    /// Section number (`"1"` for the first root).
    pub section: String,
    pub name: String,
    pub description: String,
    pub base_address: String,
    /// Map size in addressable elements.
    pub size: String,
    pub units: String,
    pub endianness: Endianness,
}

/// Whether a summary row describes a register or a hole in the map.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Normal,
    Reserved,
}

/// One row of an address-map summary table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RegisterRow {
    /// A single address, or `"<start> through <end>"` for a reserved range.
    pub offset: String,
    pub identifier: String,
    pub name: String,
    /// Section number of the register's detail table; `None` for reserved rows.
    pub section: Option<String>,
    pub kind: RowKind,
}

impl RegisterRow {
    pub(crate) fn reserved(offset: String) -> Self {
        Self {
            offset,
            identifier: "-".to_string(),
            name: "-".to_string(),
            section: None,
            kind: RowKind::Reserved,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.kind == RowKind::Reserved
    }
}

/// Heading of one register's detail section.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RegisterInfo {
    /// Section number (`"1.3"`).
    pub section: String,
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub absolute_address: String,
    /// Offset relative to the owning map.
    pub offset: String,
    /// Register access, from `regaccess_p` or `RW`.
    pub access: String,
    /// Combined reset value of all fields.
    pub reset: String,
    /// Size in addressable elements.
    pub size: String,
    pub units: String,
}

/// One named value of a field encoding.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EncodingRow {
    pub name: String,
    pub value: String,
    pub description: String,
}

/// One row of a register's field table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldRow {
    /// `[msb:lsb]` or `[bit]`.
    pub bits: String,
    pub identifier: String,
    /// Type name of the field's encoding, shown under the identifier.
    pub encoding_name: Option<String>,
    pub access: AccessMnemonic,
    pub reset: String,
    pub name: String,
    pub description: String,
    /// The field is a reserved placeholder; still rendered.
    pub reserved: bool,
    pub encoding: Vec<EncodingRow>,
}
