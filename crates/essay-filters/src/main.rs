/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

fn main() -> anyhow::Result<()> {
    essay_filters::cli::main_with_preset("essay-filters", &[])
}
