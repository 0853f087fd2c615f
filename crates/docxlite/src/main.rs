#![doc = include_str!("../README.md")]

use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use docxlite::docx_tree::Element;
use docxlite::{DocxRenderer, TransformFeat};

/// The form written to OUTPUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A DOCX package.
    Docx,
    /// A standalone HTML preview.
    Html,
    /// A base64-encoded DOCX package.
    Base64,
}

/// Renders a JSON element tree into a Word document.
#[derive(Debug, Clone, Parser)]
#[clap(name = "docxlite", version)]
pub struct RenderArgs {
    /// Path to the JSON element tree, or `-` for stdin
    #[clap(value_name = "INPUT")]
    pub input: String,

    /// Path to output file, or `-` for stdout
    #[clap(value_name = "OUTPUT", default_value = None)]
    pub output: Option<String>,

    /// Forces the output format instead of inferring it from OUTPUT
    #[clap(long, value_enum, default_value = None)]
    pub format: Option<OutputFormat>,

    /// Fails on leaf elements that carry children instead of dropping them
    #[clap(long)]
    pub strict: bool,

    /// Overrides the title of the HTML preview
    #[clap(long, default_value = None, value_name = "TITLE")]
    pub title: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(RenderArgs::parse())
}

fn run(args: RenderArgs) -> Result<()> {
    let is_stdin = args.input == "-";
    let is_stdout = args.output.as_deref() == Some("-");

    let output_path = match args.output.as_deref() {
        Some(output) => PathBuf::from(output),
        None if is_stdin => bail!("OUTPUT is required when reading from stdin"),
        None => Path::new(&args.input).with_extension("docx"),
    };

    let output_format = args.format.unwrap_or_else(|| {
        match output_path.extension().and_then(std::ffi::OsStr::to_str) {
            Some("html" | "htm") => OutputFormat::Html,
            Some("b64" | "txt") => OutputFormat::Base64,
            _ => OutputFormat::Docx,
        }
    });

    let source = if is_stdin {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read from stdin")?;
        source
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read file {:?}", args.input))?
    };
    let element: Element =
        serde_json::from_str(&source).context("failed to parse the element tree")?;

    let renderer = DocxRenderer::new().with_feature(TransformFeat {
        strict_leaf_children: args.strict,
        preview_title: args.title,
    });

    let result = match output_format {
        OutputFormat::Docx => renderer.render_to_buffer(element)?,
        OutputFormat::Html => renderer.render_to_html(element)?.as_bytes().to_vec(),
        OutputFormat::Base64 => renderer.render_to_base64(element)?.into_bytes(),
    };
    log::info!("rendered {} bytes as {output_format:?}", result.len());

    if is_stdout {
        std::io::stdout()
            .write_all(&result)
            .context("failed to write to stdout")?;
    } else if let Err(err) = std::fs::write(&output_path, &result) {
        bail!("failed to write file {output_path:?}: {err}");
    }

    Ok(())
}
