/*
 * errors.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::config::ConfigError;
use crate::filter_context::Diagnostic;
use crate::readers::json::JsonReadError;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("failed to read Pandoc JSON: {0}")]
    Read(#[from] JsonReadError),

    #[error("failed to write Pandoc JSON: {0}")]
    Write(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("filtering failed:\n{}", render_diagnostics(.0))]
    Diagnostics(Vec<Diagnostic>),
}

pub type Result<T> = std::result::Result<T, FilterError>;

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}
