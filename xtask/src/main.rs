// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand};
use log::LevelFilter;
use mcu_registers_docgen::DocumentFormat;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod reg_doc;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Xtask {
    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate register documentation from an elaborated register model
    RegDoc {
        /// Elaborated model (JSON)
        #[arg(short, long, value_name = "FILE")]
        model: PathBuf,

        /// Document to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output format: markdown or json
        #[arg(long, default_value = "markdown")]
        format: DocumentFormat,

        /// TOML file with export options
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Print instance names in lowercase
        #[arg(long, default_value_t = false)]
        lowercase: bool,

        /// List fields most significant first
        #[arg(long, default_value_t = false)]
        msb_first: bool,

        /// Text placed at the top of the first page
        #[arg(long)]
        header: Option<String>,

        /// Log every reserved range and skipped node
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
}

fn main() {
    let cli = Xtask::parse();
    let result = match &cli.xtask {
        Commands::RegDoc {
            model,
            output,
            format,
            options,
            lowercase,
            msb_first,
            header,
            verbose,
        } => {
            let level = if *verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            let _ = SimpleLogger::new().with_level(level).init();
            reg_doc::generate(&reg_doc::Args {
                model,
                output,
                format: *format,
                options_file: options.as_deref(),
                lowercase: *lowercase,
                msb_first: *msb_first,
                header: header.as_deref(),
            })
        }
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}
