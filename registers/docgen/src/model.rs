// Licensed under the Apache-2.0 license

//! Elaborated register model consumed by the exporter.
//!
//! The model is produced by an external SystemRDL compiler and handed over
//! as JSON. It is read-only here: the exporter walks it, looks properties up
//! and never changes it.
//!
//! ```text
//! Model
//! └── roots: Vec<AddrMap>
//!     ├── Reg      # register with fields
//!     ├── AddrMap  # nested address map
//!     └── Mem      # memory region (not documented)
//! ```
//!
//! Property lookup goes through the [`Component`] trait, which separates
//! native properties (`name`, `desc`, `regwidth`, ...) from user-defined
//! ones (`base_address_p`, `addr_elem_size`, ...).

use crate::access::{OnReadType, OnWriteType, SwAccess};
use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A property value as emitted by the compiler.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    U64(u64),
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::U64(v) => write!(f, "{v:#x}"),
            PropertyValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<u64> for PropertyValue {
    fn from(val: u64) -> Self {
        PropertyValue::U64(val)
    }
}
impl From<bool> for PropertyValue {
    fn from(val: bool) -> Self {
        PropertyValue::Bool(val)
    }
}
impl From<&str> for PropertyValue {
    fn from(val: &str) -> Self {
        PropertyValue::String(val.into())
    }
}

/// Property name to value.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Widest register the exporter can document.
pub const MAX_REGWIDTH: u32 = 128;

/// Parses `0x`-prefixed hex or decimal integers, allowing `_` separators.
fn parse_int(s: &str) -> Option<u128> {
    let s: String = s.trim().chars().filter(|c| *c != '_').collect();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u128::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Read access to the properties of a model node.
///
/// The typed getters take the node's hierarchical path so a value of the
/// wrong kind can be reported against the node that carries it.
pub trait Component {
    /// Instance name as written in the source.
    fn inst_name(&self) -> &str;

    fn properties(&self) -> &Properties;

    fn user_properties(&self) -> &Properties;

    /// Looks a property up, native first.
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties()
            .get(name)
            .or_else(|| self.user_properties().get(name))
    }

    /// True only if `name` is a user-defined property set on this node.
    fn has_user_defined(&self, name: &str) -> bool {
        self.user_properties().contains_key(name)
    }

    fn u64_property(&self, path: &str, name: &str) -> Result<Option<u64>> {
        match self.u128_property(path, name)? {
            None => Ok(None),
            Some(v) => u64::try_from(v)
                .map(Some)
                .map_err(|_| ExportError::invalid(path, name, format!("{v:#x}"))),
        }
    }

    /// Integer property that may be wider than 64 bits. Values above
    /// `u64::MAX` can only be written as strings.
    fn u128_property(&self, path: &str, name: &str) -> Result<Option<u128>> {
        match self.property(name) {
            None => Ok(None),
            Some(PropertyValue::U64(v)) => Ok(Some(u128::from(*v))),
            Some(PropertyValue::Bool(b)) => Ok(Some(u128::from(*b))),
            Some(PropertyValue::String(s)) => match parse_int(s) {
                Some(v) => Ok(Some(v)),
                None => Err(ExportError::invalid(path, name, format!("\"{s}\""))),
            },
        }
    }

    fn bool_property(&self, path: &str, name: &str) -> Result<Option<bool>> {
        match self.property(name) {
            None => Ok(None),
            Some(PropertyValue::Bool(b)) => Ok(Some(*b)),
            Some(PropertyValue::U64(0)) => Ok(Some(false)),
            Some(PropertyValue::U64(1)) => Ok(Some(true)),
            Some(other) => Err(ExportError::invalid(path, name, other)),
        }
    }

    fn string_property(&self, path: &str, name: &str) -> Result<Option<&str>> {
        match self.property(name) {
            None => Ok(None),
            Some(PropertyValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ExportError::invalid(path, name, other)),
        }
    }

    /// A user-defined integer property; native properties of the same name
    /// are ignored.
    fn user_u64_property(&self, path: &str, name: &str) -> Result<Option<u64>> {
        if !self.has_user_defined(name) {
            return Ok(None);
        }
        self.u64_property(path, name)
    }

    /// The `name` property, or the instance name when it is not set.
    fn display_name(&self, path: &str) -> Result<String> {
        Ok(self
            .string_property(path, "name")?
            .unwrap_or_else(|| self.inst_name())
            .to_string())
    }

    /// The `desc` property flattened onto one line.
    fn description(&self, path: &str) -> Result<String> {
        Ok(self
            .string_property(path, "desc")?
            .map(normalize_desc)
            .unwrap_or_default())
    }
}

/// Flattens a description onto one line and collapses doubled spaces.
pub fn normalize_desc(desc: &str) -> String {
    desc.replace('\n', " ").replace("  ", " ")
}

macro_rules! impl_component {
    ($ty:ty) => {
        impl Component for $ty {
            fn inst_name(&self) -> &str {
                &self.inst_name
            }
            fn properties(&self) -> &Properties {
                &self.properties
            }
            fn user_properties(&self) -> &Properties {
                &self.user_properties
            }
        }
    };
}

//=============================================================================
// Model - one or more elaborated roots
//=============================================================================

/// The elaborated output of one compiler run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Model {
    pub roots: Vec<AddrMap>,
}

impl Model {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

//=============================================================================
// AddrMap
//=============================================================================

/// An address map: a sized container of registers, memories and maps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddrMap {
    pub inst_name: String,
    /// Byte offset within the parent map.
    #[serde(default)]
    pub address_offset: u64,
    /// Total size in bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub user_properties: Properties,
    /// Children in declaration order.
    #[serde(default)]
    pub children: Vec<Child>,
}

impl_component!(AddrMap);

impl AddrMap {
    /// Registers directly inside this map, in declaration order.
    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.children.iter().filter_map(|c| match c {
            Child::Reg(reg) => Some(reg),
            _ => None,
        })
    }

    /// Address maps directly inside this map.
    pub fn addrmaps(&self) -> impl Iterator<Item = &AddrMap> {
        self.children.iter().filter_map(|c| match c {
            Child::Addrmap(map) => Some(map),
            _ => None,
        })
    }

    pub fn memories(&self) -> impl Iterator<Item = &Mem> {
        self.children.iter().filter_map(|c| match c {
            Child::Mem(mem) => Some(mem),
            _ => None,
        })
    }
}

/// A child node of an address map.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Child {
    Reg(Register),
    Addrmap(AddrMap),
    Mem(Mem),
}

//=============================================================================
// Register
//=============================================================================

/// A register, possibly an array of registers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Register {
    pub inst_name: String,
    /// Byte offset of the first element within the owning map.
    pub address_offset: u64,
    #[serde(default)]
    pub array_dimensions: Option<Vec<u64>>,
    /// Byte distance between array elements; defaults to the register size.
    #[serde(default)]
    pub array_stride: Option<u64>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub user_properties: Properties,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl_component!(Register);

impl Register {
    pub fn is_array(&self) -> bool {
        self.array_dimensions
            .as_ref()
            .is_some_and(|dims| !dims.is_empty())
    }

    /// Register width in bits. There is no default: a register without
    /// `regwidth` cannot be documented.
    pub fn regwidth(&self, path: &str) -> Result<u32> {
        let width = self
            .u64_property(path, "regwidth")?
            .ok_or_else(|| ExportError::missing(path, "regwidth"))?;
        if width == 0 || width % 8 != 0 || width > u64::from(MAX_REGWIDTH) {
            return Err(ExportError::invalid(path, "regwidth", width));
        }
        Ok(width as u32)
    }

    /// Size of one element in bytes.
    pub fn size(&self, path: &str) -> Result<u64> {
        Ok(u64::from(self.regwidth(path)? / 8))
    }

    pub fn stride(&self, path: &str) -> Result<u64> {
        match self.array_stride {
            Some(stride) => Ok(stride),
            None => self.size(path),
        }
    }

    /// Number of array elements (1 for a plain register).
    pub fn element_count(&self) -> u64 {
        self.array_dimensions
            .as_ref()
            .map(|dims| dims.iter().product())
            .unwrap_or(1)
    }

    /// Bytes occupied by the register, or by the whole array.
    pub fn total_size(&self, path: &str) -> Result<u64> {
        if self.is_array() {
            Ok(self.stride(path)? * self.element_count())
        } else {
            self.size(path)
        }
    }
}

//=============================================================================
// Field
//=============================================================================

/// A bit field inside a register.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Field {
    pub inst_name: String,
    pub lsb: u32,
    pub msb: u32,
    #[serde(default)]
    pub sw: SwAccess,
    #[serde(default)]
    pub onread: Option<OnReadType>,
    #[serde(default)]
    pub onwrite: Option<OnWriteType>,
    #[serde(default)]
    pub encode: Option<Encoding>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub user_properties: Properties,
}

impl_component!(Field);

impl Field {
    pub fn width(&self) -> u32 {
        self.msb.saturating_sub(self.lsb) + 1
    }

    /// `[msb:lsb]`, or `[bit]` for a single-bit field.
    pub fn bits(&self) -> String {
        if self.msb != self.lsb {
            format!("[{}:{}]", self.msb, self.lsb)
        } else {
            format!("[{}]", self.msb)
        }
    }

    /// Reset value, 0 when unspecified.
    pub fn reset(&self, path: &str) -> Result<u128> {
        Ok(self.u128_property(path, "reset")?.unwrap_or(0))
    }

    /// Fields whose instance name mentions "reserved" in any case.
    pub fn is_reserved(&self) -> bool {
        self.inst_name.to_lowercase().contains("reserved")
    }
}

/// A named value table attached to a field through `encode`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub type_name: String,
    #[serde(default)]
    pub members: Vec<EncodingMember>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EncodingMember {
    pub name: String,
    pub value: u128,
    #[serde(default)]
    pub desc: Option<String>,
}

//=============================================================================
// Mem
//=============================================================================

/// A memory region (SRAM, tables).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mem {
    pub inst_name: String,
    pub address_offset: u64,
    /// Number of entries.
    #[serde(default)]
    pub entries: u64,
    /// Width of each entry in bits.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub user_properties: Properties,
}

impl_component!(Mem);
