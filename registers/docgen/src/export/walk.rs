// Licensed under the Apache-2.0 license

use crate::access::resolve_access;
use crate::backend::DocumentBackend;
use crate::config::{ExportOptions, FieldOrder};
use crate::context::MapContext;
use crate::error::{ExportError, Result};
use crate::format::{format_number, format_size};
use crate::model::{normalize_desc, AddrMap, Component, Field, Register};
use crate::output::{AddrmapInfo, EncodingRow, FieldRow, RegisterInfo};
use crate::reconcile::{reconcile, ArrayShape, Placement};
use log::{debug, info};

/// Access shown for registers without a `regaccess_p` override.
const DEFAULT_REG_ACCESS: &str = "RW";

/// Drives the backend through every map of an export.
pub(super) struct Walker<'a, B: ?Sized> {
    backend: &'a mut B,
    options: &'a ExportOptions,
    maps: usize,
}

impl<'a, B: DocumentBackend + ?Sized> Walker<'a, B> {
    pub(super) fn new(backend: &'a mut B, options: &'a ExportOptions) -> Self {
        Self {
            backend,
            options,
            maps: 0,
        }
    }

    /// Documents `root` and every map below it. `section` numbers every
    /// heading produced for this root.
    pub(super) fn walk_root(&mut self, root: &AddrMap, section: usize) -> Result<()> {
        self.walk_map(root, &root.inst_name, section)
    }

    /// Builds the document and returns the number of maps documented.
    pub(super) fn finish(self) -> Result<usize> {
        self.backend.build_document()?;
        Ok(self.maps)
    }

    fn walk_map(&mut self, map: &AddrMap, path: &str, section: usize) -> Result<()> {
        for sub in map.addrmaps() {
            self.walk_map(sub, &format!("{path}.{}", sub.inst_name), section)?;
        }
        for mem in map.memories() {
            debug!("{path}.{}: memory not documented", mem.inst_name);
        }

        let ctx = MapContext::resolve(map, path)?;
        info!(
            "{path}: base {:#x}, {}-bit addresses in {}",
            ctx.base_address,
            ctx.address_width,
            ctx.units()
        );
        self.summary(map, path, section, &ctx)?;
        self.details(map, path, section, &ctx)?;
        self.maps += 1;
        Ok(())
    }

    /// Pass A: map header and the register summary table.
    fn summary(
        &mut self,
        map: &AddrMap,
        path: &str,
        section: usize,
        ctx: &MapContext,
    ) -> Result<()> {
        self.backend.create_addrmap_info(&AddrmapInfo {
            section: section.to_string(),
            name: map.display_name(path)?,
            description: map.description(path)?,
            base_address: ctx.format_byte_address(ctx.base_address),
            size: format_size(ctx.to_elements(map.size)),
            units: ctx.units(),
            endianness: ctx.endianness,
        })?;

        let placements = map
            .registers()
            .enumerate()
            .map(|(idx, reg)| {
                self.placement(
                    reg,
                    &format!("{path}.{}", reg.inst_name),
                    format!("{section}.{}", idx + 1),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        for row in reconcile(ctx, &placements) {
            self.backend.create_reg_list_info(&row, row.is_reserved())?;
        }
        self.backend.dump_reg_list_info()
    }

    fn placement(&self, reg: &Register, path: &str, section: String) -> Result<Placement> {
        let array = if reg.is_array() {
            Some(ArrayShape {
                dimensions: reg.array_dimensions.clone().unwrap_or_default(),
                stride: reg.stride(path)?,
            })
        } else {
            None
        };
        Ok(Placement {
            raw_offset: reg.address_offset,
            total_size: reg.total_size(path)?,
            identifier: self.options.identifier(&reg.inst_name),
            name: reg.display_name(path)?,
            section,
            array,
            unroll: reg.bool_property(path, "unroll")?.unwrap_or(false),
        })
    }

    /// Pass B: one detail section per register, in declaration order.
    fn details(
        &mut self,
        map: &AddrMap,
        path: &str,
        section: usize,
        ctx: &MapContext,
    ) -> Result<()> {
        for (idx, reg) in map.registers().enumerate() {
            let reg_path = format!("{path}.{}", reg.inst_name);
            let info = self.register_info(reg, &reg_path, format!("{section}.{}", idx + 1), ctx)?;
            self.backend.create_register_info(&info)?;

            let mut fields: Vec<&Field> = reg.fields.iter().collect();
            if self.options.field_order == FieldOrder::MsbFirst {
                fields.reverse();
            }
            for field in fields {
                let row = self.field_row(field, &format!("{reg_path}.{}", field.inst_name))?;
                self.backend.create_fields_list_info(&row)?;
            }
            self.backend.dump_field_list_info()?;
        }
        Ok(())
    }

    fn register_info(
        &self,
        reg: &Register,
        path: &str,
        section: String,
        ctx: &MapContext,
    ) -> Result<RegisterInfo> {
        let regwidth = reg.regwidth(path)?;
        let access = if reg.has_user_defined("regaccess_p") {
            reg.string_property(path, "regaccess_p")?
                .unwrap_or(DEFAULT_REG_ACCESS)
        } else {
            DEFAULT_REG_ACCESS
        };

        Ok(RegisterInfo {
            section,
            identifier: self.options.identifier(&reg.inst_name),
            name: reg.display_name(path)?,
            description: reg.description(path)?,
            absolute_address: ctx
                .format_byte_address(ctx.base_address.wrapping_add(reg.address_offset)),
            offset: ctx.format_byte_address(reg.address_offset),
            access: access.to_string(),
            reset: format_number(register_reset(reg, path, regwidth)?, regwidth),
            size: format_size(ctx.to_elements(reg.total_size(path)?)),
            units: ctx.units(),
        })
    }

    fn field_row(&self, field: &Field, path: &str) -> Result<FieldRow> {
        let width = field.width();
        let encoding = field
            .encode
            .iter()
            .flat_map(|enc| enc.members.iter())
            .map(|member| EncodingRow {
                name: member.name.clone(),
                value: format_number(member.value, width),
                description: member.desc.as_deref().map(normalize_desc).unwrap_or_default(),
            })
            .collect();

        Ok(FieldRow {
            bits: field.bits(),
            identifier: self.options.identifier(&field.inst_name),
            encoding_name: field.encode.as_ref().map(|enc| enc.type_name.clone()),
            access: resolve_access(field.sw, field.onread, field.onwrite),
            reset: format_number(field.reset(path)?, width),
            name: field.display_name(path)?,
            description: field.description(path)?,
            reserved: field.is_reserved(),
            encoding,
        })
    }
}

/// ORs every field's reset value into place.
fn register_reset(reg: &Register, path: &str, regwidth: u32) -> Result<u128> {
    reg.fields.iter().try_fold(0u128, |reset, field| {
        let field_path = format!("{path}.{}", field.inst_name);
        if field.msb < field.lsb || field.msb >= regwidth {
            return Err(ExportError::invalid(
                &field_path,
                "bits",
                format!("[{}:{}] in a {regwidth}-bit register", field.msb, field.lsb),
            ));
        }
        Ok(reset | (field.reset(&field_path)? << field.lsb))
    })
}
