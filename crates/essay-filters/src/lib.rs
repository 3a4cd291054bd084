/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

pub mod cli;
pub mod config;
pub mod errors;
pub mod filter_context;
pub mod filters;
pub mod heading_labels;
pub mod pipeline;
pub mod readers;
pub mod transforms;
pub mod writers;
