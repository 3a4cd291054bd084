/*
 * pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Read, filter and write a Pandoc JSON document.
 */

use std::io::{Read, Write};

use essay_pandoc_types::Pandoc;

use crate::config::{ConfigOverrides, FilterConfig};
use crate::errors::{FilterError, Result};
use crate::filter_context::{Diagnostic, FilterContext};
use crate::readers;
use crate::transforms::{AnnotationTransform, AppendixTransform, TransformPipeline};
use crate::writers;

/// Options for one filter run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Base configuration (defaults, possibly merged with a config file)
    pub config: FilterConfig,
    pub overrides: ConfigOverrides,
    /// Output format pandoc passes as the filter's first argument
    pub target_format: Option<String>,
}

/// Build the transform pipeline for `config`. Appendix labels run before
/// annotation rewriting.
pub fn build_pipeline(config: &FilterConfig) -> TransformPipeline {
    let mut pipeline = TransformPipeline::new();
    if config.appendix.enabled {
        pipeline.push(Box::new(AppendixTransform::new(&config.appendix)));
    }
    if config.annotations.enabled {
        pipeline.push(Box::new(AnnotationTransform::new(&config.annotations)));
    }
    pipeline
}

/// Apply the configured transforms to `doc`.
///
/// The document metadata is consulted for per-document settings before
/// the command-line overrides are applied on top. Any error diagnostic
/// fails the run once every transform has finished.
pub fn filter_document(
    doc: &mut Pandoc,
    options: &RunOptions,
    ctx: &mut FilterContext,
) -> Result<()> {
    let mut config = options.config.clone();
    config.apply_metadata(&doc.meta, ctx);
    config.apply_overrides(&options.overrides)?;

    let pipeline = build_pipeline(&config);
    tracing::debug!(
        transforms = ?pipeline.names(),
        target_format = ctx.target_format.as_deref().unwrap_or("<none>"),
        "Filtering document"
    );
    pipeline.execute(doc, ctx);

    if ctx.has_errors() {
        return Err(FilterError::Diagnostics(ctx.diagnostics().to_vec()));
    }
    Ok(())
}

/// Read a document from `input`, filter it and write it to `output`.
///
/// Returns the warnings collected along the way. Nothing is written when
/// reading or filtering fails.
pub fn run<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    options: &RunOptions,
) -> Result<Vec<Diagnostic>> {
    let mut doc = readers::json::read(input)?;
    let mut ctx = FilterContext::with_target_format(options.target_format.clone());

    filter_document(&mut doc, options, &mut ctx)?;

    writers::json::write(&doc, output)?;
    output.flush()?;
    Ok(ctx.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformKind;

    #[test]
    fn test_build_pipeline_respects_enabled_flags() {
        let mut config = FilterConfig::default();
        assert_eq!(build_pipeline(&config).names(), vec!["appendix", "annotations"]);

        config.apply_overrides(&ConfigOverrides {
            only: vec![TransformKind::Appendix],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(build_pipeline(&config).names(), vec!["appendix"]);

        config.appendix.enabled = false;
        assert!(build_pipeline(&config).is_empty());
    }

    #[test]
    fn test_run_rejects_invalid_input_without_output() {
        let mut input = "{\"blocks\": []}".as_bytes();
        let mut output = Vec::new();
        let err = run(&mut input, &mut output, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::Read(_)));
        assert!(output.is_empty());
    }

    #[test]
    fn test_empty_marker_override_fails_before_filtering() {
        let mut input = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[
            {"t":"RawBlock","c":["tex","\\clearpage"]},
            {"t":"Para","c":[{"t":"Str","c":"x"}]}]}"#
            .as_bytes();
        let mut output = Vec::new();
        let options = RunOptions {
            overrides: ConfigOverrides {
                marker: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = run(&mut input, &mut output, &options).unwrap_err();
        assert!(matches!(err, FilterError::Config(_)));
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_empty_document() {
        let mut input =
            r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#.as_bytes();
        let mut output = Vec::new();
        let warnings = run(&mut input, &mut output, &RunOptions::default()).unwrap();
        assert!(warnings.is_empty());
        insta::assert_snapshot!(
            String::from_utf8(output).unwrap(),
            @r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[]}"#
        );
    }
}
