/*
 * cli.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Command-line front end shared by the filter binaries.
 */

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AnnotationStyle, ConfigOverrides, FilterConfig, TransformKind};
use crate::pipeline::{self, RunOptions};

/// Pandoc JSON filter for essay sites.
///
/// Reads a Pandoc JSON document, letters the headings after `\appendix`,
/// turns `\todo{}`/`\AT{}`/`\AS{}` into margin asides, and writes the
/// document back out. Pandoc runs it as `--filter`, passing the output
/// format as the first argument.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Output format pandoc is producing
    pub target_format: Option<String>,

    /// Read the document from FILE instead of stdin
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the document to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run only these transforms (appendix, annotations)
    #[arg(long = "only", value_name = "TRANSFORM", action = clap::ArgAction::Append)]
    pub only: Vec<TransformKind>,

    /// How annotations are emitted (element, span)
    #[arg(long = "annotation-style", value_name = "STYLE")]
    pub annotation_style: Option<AnnotationStyle>,

    /// Raw TeX text that starts the appendix
    #[arg(long = "marker", value_name = "TEXT")]
    pub marker: Option<String>,

    /// YAML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "essay_filters=debug"
    } else {
        "essay_filters=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        // stdout carries the document
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Entry point for the filter binaries. `preset` restricts the transforms
/// when `--only` is not given.
pub fn main_with_preset(name: &'static str, preset: &[TransformKind]) -> Result<()> {
    let args = Args::command_for(name).unwrap_or_else(|e| e.exit());
    init_tracing(args.verbose);
    run(args, preset)
}

impl Args {
    fn command_for(name: &'static str) -> std::result::Result<Self, clap::Error> {
        use clap::{CommandFactory, FromArgMatches};
        let matches = Self::command().name(name).try_get_matches()?;
        Self::from_arg_matches(&matches)
    }
}

pub fn run(args: Args, preset: &[TransformKind]) -> Result<()> {
    let config = match &args.config {
        Some(path) => FilterConfig::from_yaml_file(path)?,
        None => FilterConfig::default(),
    };

    let only = if args.only.is_empty() {
        preset.to_vec()
    } else {
        args.only
    };
    let options = RunOptions {
        config,
        overrides: ConfigOverrides {
            only,
            annotation_style: args.annotation_style,
            marker: args.marker,
        },
        target_format: args.target_format,
    };

    let mut input: Box<dyn io::Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    // Filter into memory first so a failed run never leaves a truncated file.
    let mut buffer = Vec::new();
    let warnings = pipeline::run(&mut input, &mut buffer, &options)?;
    tracing::debug!(warnings = warnings.len(), "Filter run complete");

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            io::Write::write_all(&mut writer, &buffer)?;
            io::Write::flush(&mut writer)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            io::Write::write_all(&mut stdout, &buffer)?;
            io::Write::flush(&mut stdout)?;
        }
    }
    Ok(())
}
