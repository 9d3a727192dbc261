// Licensed under the Apache-2.0 license

//! Options for one export run.
//!
//! [`ExportOptions`] is built either in code, builder style, or from
//! `key = value` pairs (a TOML file or command-line overrides). Unknown keys
//! and values are rejected before the model is touched.
//!
//! # Example
//!
//! ```
//! use mcu_registers_docgen::config::{ExportOptions, FieldOrder};
//!
//! let options = ExportOptions::new()
//!     .uppercase_identifiers(false)
//!     .field_order(FieldOrder::MsbFirst);
//! assert_eq!(options.identifier("Ctrl_Reg"), "ctrl_reg");
//!
//! let options = ExportOptions::from_toml_str("field_display_order = \"msb-first\"").unwrap();
//! assert_eq!(options.field_order, FieldOrder::MsbFirst);
//! assert!(ExportOptions::from_toml_str("colour = \"blue\"").is_err());
//! ```

use crate::error::{ExportError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Order in which a register's fields are listed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum FieldOrder {
    /// As declared in the source.
    #[default]
    Declaration,
    /// Declaration order reversed, so the most significant field comes first.
    MsbFirst,
}

/// What a page decoration gets to see.
#[derive(Clone, Copy, Debug)]
pub struct PageContext<'a> {
    /// 1-based page (map section) number.
    pub page: usize,
    /// Heading of the map that starts the page.
    pub title: &'a str,
    /// Generation timestamp of the document.
    pub generated: &'a str,
}

/// Produces text placed at the top of a page.
pub type PageDecoration = Arc<dyn Fn(&PageContext<'_>) -> String + Send + Sync>;

/// Decorations for the first and the following pages. The exporter never
/// calls them; they are passed through to the document writer.
#[derive(Clone, Default)]
pub struct PageDecorations {
    pub first_page: Option<PageDecoration>,
    pub later_pages: Option<PageDecoration>,
}

impl fmt::Debug for PageDecorations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDecorations")
            .field("first_page", &self.first_page.is_some())
            .field("later_pages", &self.later_pages.is_some())
            .finish()
    }
}

/// Options recognised by the exporter.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Print instance names in uppercase (default) or lowercase.
    pub use_uppercase_identifiers: bool,
    pub field_order: FieldOrder,
    pub page_decorations: PageDecorations,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            use_uppercase_identifiers: true,
            field_order: FieldOrder::Declaration,
            page_decorations: PageDecorations::default(),
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uppercase_identifiers(mut self, uppercase: bool) -> Self {
        self.use_uppercase_identifiers = uppercase;
        self
    }

    pub fn field_order(mut self, order: FieldOrder) -> Self {
        self.field_order = order;
        self
    }

    pub fn on_first_page(
        mut self,
        decoration: impl Fn(&PageContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.page_decorations.first_page = Some(Arc::new(decoration));
        self
    }

    pub fn on_later_pages(
        mut self,
        decoration: impl Fn(&PageContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.page_decorations.later_pages = Some(Arc::new(decoration));
        self
    }

    /// Sets one option from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "use_uppercase_identifiers" => {
                self.use_uppercase_identifiers = value.parse().map_err(|_| {
                    ExportError::Config(format!("{key} expects true or false, got '{value}'"))
                })?;
            }
            "field_display_order" => {
                self.field_order = FieldOrder::from_str(value).map_err(|_| {
                    ExportError::Config(format!(
                        "{key} expects 'declaration' or 'msb-first', got '{value}'"
                    ))
                })?;
            }
            _ => return Err(ExportError::Config(format!("unexpected option '{key}'"))),
        }
        Ok(())
    }

    /// Applies every `key = value` pair of a TOML document on top of the
    /// defaults.
    pub fn from_toml_str(toml_src: &str) -> Result<Self> {
        let table: toml::Table = toml_src
            .parse()
            .map_err(|e: toml::de::Error| ExportError::Config(e.to_string()))?;
        let mut options = Self::default();
        for (key, value) in &table {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    return Err(ExportError::Config(format!(
                        "{key} has unsupported value {other}"
                    )))
                }
            };
            options.set(key, &value)?;
        }
        Ok(options)
    }

    /// Applies the identifier case to an instance name.
    pub fn identifier(&self, inst_name: &str) -> String {
        if self.use_uppercase_identifiers {
            inst_name.to_uppercase()
        } else {
            inst_name.to_lowercase()
        }
    }
}
