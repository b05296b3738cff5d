// Copyright © 2026 CookbookFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # CookbookFlow CLI
//!
//! This is the main entry point for the CookbookFlow command-line interface.
//! It initialises the logger, runs the selected command, and reports any
//! build failure on stderr with a non-zero exit status.

use anyhow::Context;

fn run() -> Result<(), anyhow::Error> {
    cookbookflow::cli::execute().context("cookbook build failed")?;
    Ok(())
}

/// The main entry point for the CookbookFlow CLI.
fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
