// Licensed under the Apache-2.0 license

//! Command that documents an elaborated register model.

use anyhow::{Context, Result};
use log::info;
use mcu_registers_docgen::{export, DocumentFormat, ExportOptions, FieldOrder, Model};
use std::path::Path;

pub struct Args<'a> {
    pub model: &'a Path,
    pub output: &'a Path,
    pub format: DocumentFormat,
    pub options_file: Option<&'a Path>,
    pub lowercase: bool,
    pub msb_first: bool,
    pub header: Option<&'a str>,
}

/// Options from the TOML file, with command-line flags applied on top.
pub fn export_options(args: &Args<'_>) -> Result<ExportOptions> {
    let mut options = match args.options_file {
        Some(path) => {
            let toml_src = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ExportOptions::from_toml_str(&toml_src)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => ExportOptions::default(),
    };
    if args.lowercase {
        options = options.uppercase_identifiers(false);
    }
    if args.msb_first {
        options = options.field_order(FieldOrder::MsbFirst);
    }
    if let Some(header) = args.header {
        let header = header.to_string();
        options = options.on_first_page(move |page| {
            format!("{header}\n\n_Generated {}_", page.generated)
        });
    }
    Ok(options)
}

pub fn generate(args: &Args<'_>) -> Result<()> {
    let options = export_options(args)?;
    info!("Reading model from {}", args.model.display());
    let model = Model::from_file(args.model)
        .with_context(|| format!("loading {}", args.model.display()))?;

    export(&model.roots, args.output, args.format, &options)?;
    println!("Output written to: {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(model: &'a Path, output: &'a Path) -> Args<'a> {
        Args {
            model,
            output,
            format: DocumentFormat::Markdown,
            options_file: None,
            lowercase: false,
            msb_first: false,
            header: None,
        }
    }

    #[test]
    fn test_flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("options.toml");
        std::fs::write(&toml_path, "field_display_order = \"declaration\"\n").unwrap();

        let mut args = args(Path::new("unused.json"), Path::new("unused.md"));
        args.options_file = Some(&toml_path);
        args.msb_first = true;
        args.lowercase = true;
        let options = export_options(&args).unwrap();
        assert_eq!(options.field_order, FieldOrder::MsbFirst);
        assert!(!options.use_uppercase_identifiers);
    }

    #[test]
    fn test_bad_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("options.toml");
        std::fs::write(&toml_path, "page_size = \"A4\"\n").unwrap();

        let mut args = args(Path::new("unused.json"), Path::new("unused.md"));
        args.options_file = Some(&toml_path);
        assert!(export_options(&args).is_err());
    }

    #[test]
    fn test_generate() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        let output = dir.path().join("regs.md");
        std::fs::write(
            &model,
            r#"{ "roots": [{ "inst_name": "blk", "size": 4, "children": [
                { "reg": { "inst_name": "id", "address_offset": 0,
                           "properties": { "regwidth": 32 } } } ] }] }"#,
        )
        .unwrap();

        let mut args = args(&model, &output);
        args.header = Some("# Block registers");
        generate(&args).unwrap();

        let md = std::fs::read_to_string(&output).unwrap();
        assert!(md.starts_with("# Block registers\n\n_Generated "));
        assert!(md.contains("| 32'h0000_0000 | ID | id |"));
    }

    #[test]
    fn test_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("regs.md");
        let missing = dir.path().join("missing.json");
        assert!(generate(&args(&missing, &output)).is_err());
        assert!(!output.exists());
    }
}
