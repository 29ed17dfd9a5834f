// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-MermaidCanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-canvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `mermaid-canvas` CLI: parse markup from a file or stdin and print it back in one of
//! several forms.

use std::error::Error;
use std::io::Read;

use mermaid_canvas::format::mermaid::{generate_markup, parse_markup_with, ParseOptions};
use mermaid_canvas::layout::{auto_layout, compute_layout, LayeredLayout, LayoutOptions};
use mermaid_canvas::model::{DiagramAst, IdAllocator};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--format markup|json|layout|schema] [--strict] [<file>|-]\n\nReads diagram markup from <file> or stdin (default, or `-`).\n\n--format markup   print normalized markup (default)\n--format json     print the parsed model as JSON\n--format layout   print sequence geometry or flowchart node positions as JSON\n--format schema   print the JSON schema of the model (no input is read)\n--strict          reject lines that match no grammar instead of skipping them\n\nSet RUST_LOG (e.g. `RUST_LOG=debug`) for diagnostics on stderr."
    );
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Markup,
    Json,
    Layout,
    Schema,
}

impl OutputFormat {
    fn from_arg(raw: &str) -> Option<Self> {
        match raw {
            "markup" => Some(Self::Markup),
            "json" => Some(Self::Json),
            "layout" => Some(Self::Layout),
            "schema" => Some(Self::Schema),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    format: Option<OutputFormat>,
    strict: bool,
    input: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                if options.format.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.format = Some(OutputFormat::from_arg(&raw).ok_or(())?);
            }
            "--strict" => {
                if options.strict {
                    return Err(());
                }
                options.strict = true;
            }
            "-" => {
                if options.input.is_some() {
                    return Err(());
                }
                options.input = Some(arg);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.input.is_some() {
                    return Err(());
                }
                options.input = Some(arg);
            }
        }
    }

    Ok(options)
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn read_input(input: Option<&str>) -> std::io::Result<String> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn render_layout(diagram: &DiagramAst) -> Result<String, Box<dyn Error>> {
    let json = match diagram {
        DiagramAst::Sequence(ast) => serde_json::to_string_pretty(&compute_layout(ast))?,
        DiagramAst::Flowchart(ast) => {
            let options = LayoutOptions::for_direction(ast.direction());
            serde_json::to_string_pretty(&auto_layout(ast, &LayeredLayout, &options)?)?
        }
    };
    Ok(json)
}

fn schema_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&schemars::schema_for!(DiagramAst))
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "mermaid-canvas".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    init_logging();

    let format = options.format.unwrap_or_default();
    if format == OutputFormat::Schema {
        match schema_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("mermaid-canvas: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let text = match read_input(options.input.as_deref()) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("mermaid-canvas: {err}");
            std::process::exit(2);
        }
    };

    let parse_options = ParseOptions::default().with_strict(options.strict);
    let diagram = match parse_markup_with(&text, &mut IdAllocator::new(), parse_options) {
        Ok(diagram) => diagram,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    debug!(kind = %diagram.kind(), ?format, "parsed input");

    let result = (|| -> Result<String, Box<dyn Error>> {
        Ok(match format {
            OutputFormat::Markup => generate_markup(&diagram),
            OutputFormat::Json => serde_json::to_string_pretty(&diagram)?,
            OutputFormat::Layout => render_layout(&diagram)?,
            OutputFormat::Schema => schema_json()?,
        })
    })();

    match result {
        Ok(output) => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(err) => {
            eprintln!("mermaid-canvas: {err}");
            std::process::exit(1);
        }
    }
}
