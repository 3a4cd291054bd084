/*
 * todo_filter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `\todo{}`, `\AT{}` and `\AS{}` annotations only.

use essay_filters::config::TransformKind;

fn main() -> anyhow::Result<()> {
    essay_filters::cli::main_with_preset("todo-filter", &[TransformKind::Annotations])
}
