// Licensed under the Apache-2.0 license

//! Address-map summary rows, including the reserved holes between registers.
//!
//! Registers arrive in the order the compiler placed them (ascending offset)
//! and are folded left to right. The only state carried between steps is the
//! previous placement, used to decide whether a reserved row is needed:
//!
//! - before the first register, if it does not start at offset 0: one row
//!   from 0 up to the register;
//! - when `prev.offset + 2 * prev.size == offset`: one single-address row at
//!   the end of the previous register;
//! - any other gap: one `"<start> through <end>"` row, where the end is cut
//!   back to the last boundary of the next register's size.
//!
//! Nothing is emitted after the last register, whatever the map size.

use crate::context::MapContext;
use crate::output::{RegisterRow, RowKind};
use log::{debug, warn};

/// Shape of an array register.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayShape {
    pub dimensions: Vec<u64>,
    /// Byte distance between consecutive elements.
    pub stride: u64,
}

/// Where one register sits in its map, plus the labels of its summary row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Placement {
    /// Byte offset within the map (first element for arrays).
    pub raw_offset: u64,
    /// Bytes covered, including every array element.
    pub total_size: u64,
    pub identifier: String,
    pub name: String,
    pub section: String,
    pub array: Option<ArrayShape>,
    /// List every array element on its own row.
    pub unroll: bool,
}

/// Builds the summary rows for one map.
pub fn reconcile(ctx: &MapContext, placements: &[Placement]) -> Vec<RegisterRow> {
    let (_, rows) = placements.iter().fold(
        (None::<&Placement>, Vec::with_capacity(placements.len())),
        |(prev, mut rows), current| {
            if let Some(gap) = gap_before(ctx, prev, current) {
                debug!("{}: reserved {}", current.identifier, gap.offset);
                rows.push(gap);
            }
            push_register_rows(ctx, current, &mut rows);
            (Some(current), rows)
        },
    );
    rows
}

fn reserved_range(ctx: &MapContext, start: u64, end: u64) -> RegisterRow {
    RegisterRow::reserved(format!(
        "{} through {}",
        ctx.format_address(start),
        ctx.format_address(end)
    ))
}

fn gap_before(
    ctx: &MapContext,
    prev: Option<&Placement>,
    current: &Placement,
) -> Option<RegisterRow> {
    let Some(prev) = prev else {
        // A first register inside element 0 leaves no whole element free.
        let first = ctx.to_elements(current.raw_offset);
        if first == 0 {
            return None;
        }
        return Some(reserved_range(ctx, 0, first - 1));
    };

    let prev_end = prev.raw_offset.saturating_add(prev.total_size);
    let single_slot = prev
        .raw_offset
        .saturating_add(prev.total_size.saturating_mul(2));

    if prev.total_size > 0 && single_slot == current.raw_offset {
        return Some(RegisterRow::reserved(ctx.format_byte_address(prev_end)));
    }
    if prev_end >= current.raw_offset {
        return None;
    }

    let start = ctx.to_elements(prev_end);
    let delta = ctx.to_elements(current.raw_offset) - start;
    if delta == 0 {
        // The hole is smaller than one addressable element.
        return None;
    }
    let boundary = ctx.to_elements(current.total_size).max(1);
    let mut end = start + (delta - delta % boundary);
    if end == start {
        warn!(
            "{} is not aligned to its size; reserving the whole gap before it",
            current.identifier
        );
        end = start + delta;
    }
    Some(reserved_range(ctx, start, end - 1))
}

fn array_suffix(index: &[u64]) -> String {
    index.iter().map(|i| format!("[{i}]")).collect()
}

/// Every index tuple of an array, last dimension fastest.
fn array_indices(dimensions: &[u64]) -> Vec<Vec<u64>> {
    dimensions.iter().fold(vec![Vec::new()], |acc, &dim| {
        acc.into_iter()
            .flat_map(|prefix| {
                (0..dim).map(move |i| {
                    let mut index = prefix.clone();
                    index.push(i);
                    index
                })
            })
            .collect()
    })
}

fn push_register_rows(ctx: &MapContext, placement: &Placement, rows: &mut Vec<RegisterRow>) {
    let row = |offset: u64, identifier: String| RegisterRow {
        offset: ctx.format_byte_address(offset),
        identifier,
        name: placement.name.clone(),
        section: Some(placement.section.clone()),
        kind: RowKind::Normal,
    };

    match &placement.array {
        Some(shape) if placement.unroll => {
            for (n, index) in array_indices(&shape.dimensions).iter().enumerate() {
                let offset = placement.raw_offset + n as u64 * shape.stride;
                rows.push(row(
                    offset,
                    format!("{}{}", placement.identifier, array_suffix(index)),
                ));
            }
        }
        Some(shape) => rows.push(row(
            placement.raw_offset,
            format!("{}{}", placement.identifier, array_suffix(&shape.dimensions)),
        )),
        None => rows.push(row(placement.raw_offset, placement.identifier.clone())),
    }
}
