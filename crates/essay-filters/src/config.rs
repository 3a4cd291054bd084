/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Layered configuration for the essay filters.
 */

//! Layered configuration for the essay filters.
//!
//! Later layers win:
//!
//! 1. [`FilterConfig::default`]
//! 2. an optional YAML file ([`FilterConfig::from_yaml_file`])
//! 3. the `essay-filters` map in the document metadata
//!    ([`FilterConfig::apply_metadata`])
//! 4. command-line flags ([`FilterConfig::apply_overrides`])

use std::path::{Path, PathBuf};
use std::str::FromStr;

use essay_pandoc_types::{Meta, MetaValue};
use serde::{Deserialize, Serialize};

use crate::filter_context::FilterContext;

/// Document metadata key holding per-document settings.
pub const METADATA_KEY: &str = "essay-filters";

pub const DEFAULT_APPENDIX_MARKER: &str = "\\appendix";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// How rewritten annotations are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStyle {
    /// Raw HTML `<aside>` element (default)
    #[default]
    Element,
    /// Native Pandoc `Span` with the `aside` class
    Span,
}

impl AnnotationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Span => "span",
        }
    }
}

impl FromStr for AnnotationStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "element" | "aside" => Ok(Self::Element),
            "span" => Ok(Self::Span),
            _ => Err(ConfigError::InvalidValue {
                key: "annotation-style".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// The transforms a run can be restricted to with `--only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Appendix,
    Annotations,
}

impl FromStr for TransformKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "appendix" => Ok(Self::Appendix),
            "annotations" | "todo" => Ok(Self::Annotations),
            _ => Err(ConfigError::InvalidValue {
                key: "only".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AppendixConfig {
    pub enabled: bool,
    /// Substring of a raw block that starts the appendix
    pub marker: String,
    pub marker_formats: Vec<String>,
}

impl Default for AppendixConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            marker: DEFAULT_APPENDIX_MARKER.to_string(),
            marker_formats: vec!["tex".to_string(), "latex".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnnotationConfig {
    pub enabled: bool,
    pub style: AnnotationStyle,
    /// Raw inline formats whose text is matched against the annotation macros
    pub source_formats: Vec<String>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: AnnotationStyle::default(),
            source_formats: vec!["tex".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilterConfig {
    pub appendix: AppendixConfig,
    pub annotations: AnnotationConfig,
}

/// Settings taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// When non-empty, only these transforms run
    pub only: Vec<TransformKind>,
    pub annotation_style: Option<AnnotationStyle>,
    pub marker: Option<String>,
}

impl FilterConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        validate_marker(&config.appendix.marker)?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded filter config file");
        Self::from_yaml_str(&content)
    }

    /// Apply the `essay-filters` map from the document metadata.
    ///
    /// Unknown keys and values of the wrong type are reported as warnings
    /// and otherwise ignored.
    pub fn apply_metadata(&mut self, meta: &Meta, ctx: &mut FilterContext) {
        let Some(value) = meta.get(METADATA_KEY) else {
            return;
        };
        let MetaValue::MetaMap(entries) = value else {
            ctx.warn(format!(
                "metadata key '{}' must be a map; ignoring it",
                METADATA_KEY
            ));
            return;
        };

        for (key, value) in entries {
            match key.as_str() {
                "appendix-marker" => match value.as_text() {
                    Some(marker) if !marker.is_empty() => self.appendix.marker = marker,
                    _ => warn_invalid(ctx, key, "a non-empty string"),
                },
                "annotation-style" => {
                    match value.as_text().map(|s| s.parse::<AnnotationStyle>()) {
                        Some(Ok(style)) => self.annotations.style = style,
                        _ => warn_invalid(ctx, key, "'element' or 'span'"),
                    }
                }
                "appendix" => match value.as_bool() {
                    Some(enabled) => self.appendix.enabled = enabled,
                    None => warn_invalid(ctx, key, "a boolean"),
                },
                "annotations" => match value.as_bool() {
                    Some(enabled) => self.annotations.enabled = enabled,
                    None => warn_invalid(ctx, key, "a boolean"),
                },
                _ => ctx.warn(format!(
                    "unknown key '{}' in '{}' metadata",
                    key, METADATA_KEY
                )),
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if !overrides.only.is_empty() {
            self.appendix.enabled = overrides.only.contains(&TransformKind::Appendix);
            self.annotations.enabled = overrides.only.contains(&TransformKind::Annotations);
        }
        if let Some(style) = overrides.annotation_style {
            self.annotations.style = style;
        }
        if let Some(marker) = &overrides.marker {
            validate_marker(marker)?;
            self.appendix.marker = marker.clone();
        }
        Ok(())
    }
}

// An empty marker is a substring of every raw block.
fn validate_marker(marker: &str) -> Result<(), ConfigError> {
    if marker.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "marker".to_string(),
            value: marker.to_string(),
        });
    }
    Ok(())
}

fn warn_invalid(ctx: &mut FilterContext, key: &str, expected: &str) {
    ctx.warn(format!(
        "'{}.{}' must be {}; keeping the previous value",
        METADATA_KEY, key, expected
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use essay_pandoc_types::{Inline, Str};
    use hashlink::LinkedHashMap;

    fn meta_with(entries: Vec<(&str, MetaValue)>) -> Meta {
        let mut map = LinkedHashMap::new();
        for (k, v) in entries {
            map.insert(k.to_string(), v);
        }
        let mut meta = Meta::new();
        meta.insert(METADATA_KEY.to_string(), MetaValue::MetaMap(map));
        meta
    }

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert!(config.appendix.enabled);
        assert_eq!(config.appendix.marker, "\\appendix");
        assert_eq!(config.appendix.marker_formats, vec!["tex", "latex"]);
        assert!(config.annotations.enabled);
        assert_eq!(config.annotations.style, AnnotationStyle::Element);
        assert_eq!(config.annotations.source_formats, vec!["tex"]);
    }

    #[test]
    fn test_yaml_partial_overrides_defaults() {
        let config = FilterConfig::from_yaml_str(
            "annotations:\n  style: span\nappendix:\n  marker-formats: [latex]\n",
        )
        .unwrap();
        assert_eq!(config.annotations.style, AnnotationStyle::Span);
        assert_eq!(config.appendix.marker_formats, vec!["latex"]);
        assert_eq!(config.appendix.marker, DEFAULT_APPENDIX_MARKER);
    }

    #[test]
    fn test_yaml_unknown_key_is_error() {
        let err = FilterConfig::from_yaml_str("appendix:\n  markr: x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FilterConfig::from_yaml_file(Path::new("/nonexistent/essay.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_metadata_layer() {
        let meta = meta_with(vec![
            (
                "appendix-marker",
                MetaValue::MetaInlines(vec![Inline::Str(Str::new("%APPENDIX"))]),
            ),
            ("annotation-style", MetaValue::MetaString("span".to_string())),
            ("annotations", MetaValue::MetaBool(false)),
        ]);
        let mut config = FilterConfig::default();
        let mut ctx = FilterContext::new();
        config.apply_metadata(&meta, &mut ctx);

        assert_eq!(config.appendix.marker, "%APPENDIX");
        assert_eq!(config.annotations.style, AnnotationStyle::Span);
        assert!(!config.annotations.enabled);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_metadata_bad_values_warn() {
        let meta = meta_with(vec![
            ("annotation-style", MetaValue::MetaString("fancy".to_string())),
            ("appendix", MetaValue::MetaString("yes".to_string())),
            ("colour", MetaValue::MetaBool(true)),
        ]);
        let mut config = FilterConfig::default();
        let mut ctx = FilterContext::new();
        config.apply_metadata(&meta, &mut ctx);

        assert_eq!(config, FilterConfig::default());
        assert_eq!(ctx.diagnostics().len(), 3);
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_metadata_not_a_map_warns() {
        let mut meta = Meta::new();
        meta.insert(METADATA_KEY.to_string(), MetaValue::MetaBool(true));
        let mut config = FilterConfig::default();
        let mut ctx = FilterContext::new();
        config.apply_metadata(&meta, &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = FilterConfig::default();
        config.apply_overrides(&ConfigOverrides {
            only: vec![TransformKind::Annotations],
            annotation_style: Some(AnnotationStyle::Span),
            marker: Some("\\begin{appendices}".to_string()),
        })
        .unwrap();
        assert!(!config.appendix.enabled);
        assert!(config.annotations.enabled);
        assert_eq!(config.annotations.style, AnnotationStyle::Span);
        assert_eq!(config.appendix.marker, "\\begin{appendices}");
    }

    #[test]
    fn test_empty_marker_is_rejected_by_every_layer() {
        let err = FilterConfig::from_yaml_str("appendix:\n  marker: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "marker"));

        let mut config = FilterConfig::default();
        let err = config
            .apply_overrides(&ConfigOverrides {
                marker: Some(String::new()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(config.appendix.marker, DEFAULT_APPENDIX_MARKER);

        let meta = meta_with(vec![("appendix-marker", MetaValue::MetaString(String::new()))]);
        let mut ctx = FilterContext::new();
        config.apply_metadata(&meta, &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(config.appendix.marker, DEFAULT_APPENDIX_MARKER);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Span".parse::<AnnotationStyle>().unwrap(), AnnotationStyle::Span);
        assert!("bogus".parse::<AnnotationStyle>().is_err());
        assert_eq!("todo".parse::<TransformKind>().unwrap(), TransformKind::Annotations);
        assert_eq!(AnnotationStyle::Element.as_str(), "element");
    }
}
