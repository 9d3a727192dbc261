// Licensed under the Apache-2.0 license

use mcu_registers_docgen::{export, DocumentFormat, ExportError, ExportOptions, Model};

const MODEL: &str = r#"
{
  "roots": [{
    "inst_name": "mci",
    "size": 32,
    "properties": { "name": "MCI", "desc": "Manufacturer control interface" },
    "user_properties": { "base_address_p": "0x2100_0000" },
    "children": [
      { "reg": {
          "inst_name": "hw_rev_id",
          "address_offset": 0,
          "properties": { "regwidth": 32, "name": "Hardware revision" },
          "user_properties": { "regaccess_p": "RO" },
          "fields": [
            { "inst_name": "minor", "lsb": 0, "msb": 15, "sw": "r", "properties": { "reset": 2 } },
            { "inst_name": "major", "lsb": 16, "msb": 31, "sw": "r", "properties": { "reset": 1 } }
          ]
      } },
      { "reg": {
          "inst_name": "intr_status",
          "address_offset": 16,
          "properties": { "regwidth": 32 },
          "fields": [
            { "inst_name": "error", "lsb": 0, "msb": 0, "onwrite": "woclr" },
            { "inst_name": "reserved_31_1", "lsb": 1, "msb": 31, "sw": "r" }
          ]
      } }
    ]
  }]
}"#;

fn init_logging() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init();
}

#[test]
fn test_markdown_document() {
    init_logging();
    let model = Model::from_json_str(MODEL).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mci.md");
    let options = ExportOptions::new().on_first_page(|page| format!("# {} registers", page.title));

    export(&model.roots, &path, DocumentFormat::Markdown, &options).unwrap();

    let md = std::fs::read_to_string(&path).unwrap();
    assert!(md.starts_with("# 1 MCI registers\n"));
    assert!(md.contains("| 32'h2100_0000 | 0x20 | bytes | unspecified |"));
    assert!(md.contains("| 32'h0000_0000 | HW_REV_ID | Hardware revision |"));
    assert!(md.contains("| _32'h0000_0004 through 32'h0000_000F_ | - | _reserved_ |"));
    assert!(md.contains("| 32'h0000_0010 | INTR_STATUS | intr_status |"));
    assert!(md.contains("| 32'h2100_0000 | 32'h0000_0000 | RO | 32'h0001_0002 | 0x4 |"));
    assert!(md.contains("| [31:16] | MAJOR | RO | 16'h0001 | major |  |"));
    assert!(md.contains("| [0] | ERROR | RW1C | 1'h0 | error |  |"));
    assert!(md.contains("| [31:1] | _RESERVED_31_1_ | RO | 31'h0000_0000 | reserved_31_1 |  |"));
}

#[test]
fn test_json_document() {
    let model = Model::from_json_str(MODEL).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mci.json");

    export(&model.roots, &path, DocumentFormat::Json, &ExportOptions::default()).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let map = &doc["maps"][0];
    assert_eq!(map["info"]["base_address"], "32'h2100_0000");
    assert_eq!(map["rows"].as_array().unwrap().len(), 3);
    assert_eq!(map["registers"][1]["info"]["reset"], "32'h0000_0000");
    assert_eq!(map["registers"][1]["fields"][1]["reserved"], true);
    assert!(doc["generated"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn test_failed_export_leaves_no_file() {
    let model = Model::from_json_str(&MODEL.replace("\"regwidth\": 32 }", "}")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mci.md");

    let err = export(&model.roots, &path, DocumentFormat::Markdown, &ExportOptions::default())
        .unwrap_err();

    assert!(matches!(err, ExportError::MissingProperty { .. }));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_options_file() {
    let options = ExportOptions::from_toml_str(
        "use_uppercase_identifiers = false\nfield_display_order = \"msb-first\"\n",
    )
    .unwrap();
    let model = Model::from_json_str(MODEL).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mci.md");

    export(&model.roots, &path, DocumentFormat::Markdown, &options).unwrap();

    let md = std::fs::read_to_string(&path).unwrap();
    let major = md.find("| [31:16] | major |").unwrap();
    let minor = md.find("| [15:0] | minor |").unwrap();
    assert!(major < minor);
}
