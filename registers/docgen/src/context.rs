// Licensed under the Apache-2.0 license

//! Per-map addressing parameters.

use crate::error::{ExportError, Result};
use crate::format::format_number;
use crate::model::{AddrMap, Component};
use serde::Serialize;
use strum_macros::Display;

/// Address width used when a map does not set `address_width_p`.
pub const DEFAULT_ADDRESS_WIDTH: u32 = 32;

/// Byte order declared on a map.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endianness {
    #[strum(serialize = "big-endian")]
    Big,
    #[strum(serialize = "little-endian")]
    Little,
    #[default]
    #[strum(serialize = "unspecified")]
    Unspecified,
}

/// Addressing parameters of one map, resolved once before the map is
/// documented and passed by reference to everything that formats addresses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapContext {
    /// Width in bits of every printed address.
    pub address_width: u32,
    /// Absolute byte address of the map.
    pub base_address: u64,
    /// log2 of the bytes per addressable element; 0 for byte addressing.
    pub elem_addr_bits: u32,
    pub endianness: Endianness,
}

impl Default for MapContext {
    fn default() -> Self {
        Self {
            address_width: DEFAULT_ADDRESS_WIDTH,
            base_address: 0,
            elem_addr_bits: 0,
            endianness: Endianness::Unspecified,
        }
    }
}

impl MapContext {
    /// Reads `address_width_p`, `base_address_p`, `addr_elem_size` and the
    /// endianness flags from `map`, defaulting whatever is absent.
    pub fn resolve(map: &AddrMap, path: &str) -> Result<Self> {
        let address_width = match map.user_u64_property(path, "address_width_p")? {
            None => DEFAULT_ADDRESS_WIDTH,
            Some(w @ 1..=64) => w as u32,
            Some(w) => return Err(ExportError::invalid(path, "address_width_p", w)),
        };

        let base_address = map
            .user_u64_property(path, "base_address_p")?
            .unwrap_or(0);

        let elem_addr_bits = match map.user_u64_property(path, "addr_elem_size")? {
            None => 0,
            Some(size) if size.is_power_of_two() => size.trailing_zeros(),
            Some(size) => return Err(ExportError::invalid(path, "addr_elem_size", size)),
        };

        let endianness = if map.bool_property(path, "bigendian")?.unwrap_or(false) {
            Endianness::Big
        } else if map.bool_property(path, "littleendian")?.unwrap_or(false) {
            Endianness::Little
        } else {
            Endianness::Unspecified
        };

        Ok(Self {
            address_width,
            base_address,
            elem_addr_bits,
            endianness,
        })
    }

    /// Converts a byte quantity into addressable elements.
    pub fn to_elements(&self, bytes: u64) -> u64 {
        bytes >> self.elem_addr_bits
    }

    /// Formats an address already expressed in elements.
    pub fn format_address(&self, elements: u64) -> String {
        format_number(u128::from(elements), self.address_width)
    }

    /// Formats a byte address in element units.
    pub fn format_byte_address(&self, bytes: u64) -> String {
        self.format_address(self.to_elements(bytes))
    }

    /// Name of the addressable unit: `bytes`, `uint16`, `uint32`, ...
    pub fn units(&self) -> String {
        if self.elem_addr_bits == 0 {
            "bytes".to_string()
        } else {
            format!("uint{}", 1u64 << (self.elem_addr_bits + 3))
        }
    }
}
