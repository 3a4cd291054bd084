/*
 * appendix_filter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Appendix heading labels only.

use essay_filters::config::TransformKind;

fn main() -> anyhow::Result<()> {
    essay_filters::cli::main_with_preset("appendix-filter", &[TransformKind::Appendix])
}
