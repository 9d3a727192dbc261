// Licensed under the Apache-2.0 license

//! Software access semantics of a field and their canonical mnemonics.
//!
//! A field's behaviour as seen by software is the triple of its `sw` access
//! type and its optional `onread`/`onwrite` side effects. [`resolve_access`]
//! collapses that triple into the short code printed in the field tables
//! (`RW`, `RW1C`, `W1SRC`, ...).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The `sw` property of a field.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SwAccess {
    #[default]
    Rw,
    R,
    W,
    Rw1,
    W1,
    Na,
}

/// The `onread` side effect of a field.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OnReadType {
    Rclr,
    Rset,
    Ruser,
}

/// The `onwrite` side effect of a field.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OnWriteType {
    Woset,
    Woclr,
    Wot,
    Wzs,
    Wzc,
    Wzt,
    Wclr,
    Wset,
    Wuser,
}

/// Canonical access code shown in the documentation.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessMnemonic {
    Rw,
    W1src,
    W0src,
    Wsrc,
    W1crs,
    W0crs,
    Wcrs,
    Rw1c,
    Rw1s,
    Rw1t,
    Rw0c,
    Rw0s,
    Rw0t,
    Rwc,
    Rws,
    Wrc,
    Wrs,
    Ro,
    Rc,
    Rs,
    Wo,
    Woc,
    Wos,
    W1,
    Wo1,
    NoAccess,
}

impl AccessMnemonic {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Resolves the access mnemonic of a field.
///
/// For `rw` fields the combined read+write effects are tested first, then
/// write-only effects, then read-only effects. Combinations that match no
/// entry fall back to the plain code for the access type.
///
/// # Examples
/// ```
/// use mcu_registers_docgen::access::{resolve_access, OnReadType, OnWriteType, SwAccess};
/// assert_eq!(resolve_access(SwAccess::Rw, None, Some(OnWriteType::Woclr)).as_str(), "RW1C");
/// assert_eq!(resolve_access(SwAccess::R, Some(OnReadType::Rclr), None).as_str(), "RC");
/// ```
pub fn resolve_access(
    sw: SwAccess,
    on_read: Option<OnReadType>,
    on_write: Option<OnWriteType>,
) -> AccessMnemonic {
    use AccessMnemonic as M;
    use OnReadType::{Rclr, Rset};
    use OnWriteType::{Wclr, Woclr, Woset, Wot, Wset, Wzc, Wzs, Wzt};

    match sw {
        SwAccess::Rw => match (on_read, on_write) {
            (None, None) => M::Rw,
            (Some(Rclr), Some(Woset)) => M::W1src,
            (Some(Rclr), Some(Wzs)) => M::W0src,
            (Some(Rclr), Some(Wset)) => M::Wsrc,
            (Some(Rset), Some(Woclr)) => M::W1crs,
            (Some(Rset), Some(Wzc)) => M::W0crs,
            (Some(Rset), Some(Wclr)) => M::Wcrs,
            (_, Some(Woclr)) => M::Rw1c,
            (_, Some(Woset)) => M::Rw1s,
            (_, Some(Wot)) => M::Rw1t,
            (_, Some(Wzc)) => M::Rw0c,
            (_, Some(Wzs)) => M::Rw0s,
            (_, Some(Wzt)) => M::Rw0t,
            (_, Some(Wclr)) => M::Rwc,
            (_, Some(Wset)) => M::Rws,
            (Some(Rclr), _) => M::Wrc,
            (Some(Rset), _) => M::Wrs,
            _ => M::Rw,
        },
        SwAccess::R => match on_read {
            Some(Rclr) => M::Rc,
            Some(Rset) => M::Rs,
            _ => M::Ro,
        },
        SwAccess::W => match on_write {
            Some(Wclr) => M::Woc,
            Some(Wset) => M::Wos,
            _ => M::Wo,
        },
        SwAccess::Rw1 => M::W1,
        SwAccess::W1 => M::Wo1,
        SwAccess::Na => M::NoAccess,
    }
}
