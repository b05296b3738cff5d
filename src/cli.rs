// Copyright © 2026 CookbookFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for CookbookFlow
//!
//! This module provides the command-line interface for the cookbook build
//! tool. It handles argument parsing, command execution, and user
//! interaction.
//!
//! # Examples
//!
//! Basic usage example parsing a `build` command:
//!
//! ```
//! use cookbookflow::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "cookbookflow",
//!     "build",
//!     "--minify",
//! ]);
//!
//! assert!(matches.subcommand_matches("build").is_some());
//! ```

use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, Command};
use log::{debug, info};

use crate::content::{CollectionRegistry, RECIPES};
use crate::core::config::{ConfigBuilder, SiteConfig};
use crate::core::error::{BuildError, Result};
use crate::generators::css;
use crate::theme::{Theme, ThemePreset};
use crate::CookbookFlow;

/// The current version of CookbookFlow, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name, looked up relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = "cookbook.toml";

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "COOKBOOK_";

/// Builds and configures the CookbookFlow command-line interface.
pub fn build() -> Command {
    debug!("Building CLI command structure");

    Command::new("CookbookFlow")
        .author("CookbookFlow Contributors")
        .about("A static site build tool for the family recipe cookbook.")
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Build the static site")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Configuration file, relative to the project root")
                        .value_parser(value_parser!(PathBuf))
                        .default_value(DEFAULT_CONFIG_FILE),
                )
                .arg(
                    Arg::new("root")
                        .short('r')
                        .long("root")
                        .help("Project root directory")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Override the output directory")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("minify")
                        .short('m')
                        .long("minify")
                        .help("Minify HTML output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate every recipe document without writing output")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Configuration file, relative to the project root")
                        .value_parser(value_parser!(PathBuf))
                        .default_value(DEFAULT_CONFIG_FILE),
                )
                .arg(
                    Arg::new("root")
                        .short('r')
                        .long("root")
                        .help("Project root directory")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("."),
                ),
        )
        .subcommand(
            Command::new("theme")
                .about("Print the full stylesheet for a theme preset")
                .arg(
                    Arg::new("preset")
                        .short('p')
                        .long("preset")
                        .help("Theme preset to print")
                        .value_parser(["warm-fluid", "plain-fixed"])
                        .default_value("warm-fluid"),
                ),
        )
        .after_help(
            "\x1b[1;4mLicense:\x1b[0m\n  The project is licensed under the terms of \
             both the MIT license and the Apache License (Version 2.0).",
        )
}

/// Executes the command-line interface by matching the subcommand and arguments.
pub fn execute() -> Result<()> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("build", sub_matches)) => {
            let config = sub_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let root = sub_matches
                .get_one::<PathBuf>("root")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            let output = sub_matches.get_one::<PathBuf>("output").cloned();
            let minify = sub_matches.get_flag("minify");
            run_build(&config, &root, output, minify)
        }
        Some(("check", sub_matches)) => {
            let config = sub_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let root = sub_matches
                .get_one::<PathBuf>("root")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            run_check(&config, &root)
        }
        Some(("theme", sub_matches)) => {
            let preset = sub_matches
                .get_one::<String>("preset")
                .map(String::as_str)
                .unwrap_or("warm-fluid");
            run_theme(preset)
        }
        _ => Err(BuildError::internal("Unknown command")),
    }
}

/// Loads the site configuration for a project root.
///
/// A missing file is tolerated only for the default name; an explicitly
/// named configuration file must exist.
fn load_config(config_file: &Path, root: &Path) -> Result<SiteConfig> {
    let full_path = root.join(config_file);
    let builder = ConfigBuilder::new().with_env_prefix(ENV_PREFIX);

    let builder = if full_path.exists() {
        builder.with_file(&full_path)
    } else if config_file == Path::new(DEFAULT_CONFIG_FILE) {
        debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
        builder
    } else {
        return Err(BuildError::config(
            format!("configuration file not found: {}", full_path.display()),
            Some(full_path),
        ));
    };

    let config = builder.build()?;
    let mut config = config.read().clone();
    rebase(&mut config, root);
    Ok(config)
}

/// Rebases the configuration's relative directories onto the project root.
fn rebase(config: &mut SiteConfig, root: &Path) {
    for dir in [
        &mut config.content_dir,
        &mut config.source_dir,
        &mut config.output_dir,
    ] {
        if dir.is_relative() {
            *dir = root.join(dir.as_path());
        }
    }
}

/// Builds the site, generating pages and the stylesheet in the output directory.
fn run_build(
    config_file: &Path,
    root: &Path,
    output: Option<PathBuf>,
    minify: bool,
) -> Result<()> {
    let mut config = load_config(config_file, root)?;
    if let Some(output) = output {
        config.output_dir = if output.is_relative() {
            root.join(output)
        } else {
            output
        };
    }

    info!(
        "building site from '{}' into '{}'",
        config.content_dir.display(),
        config.output_dir.display()
    );

    let flow = CookbookFlow::new(
        config,
        CollectionRegistry::cookbook(),
        Box::new(crate::render::CookbookPageRenderer::new()),
        Box::new(crate::generators::HtmlFileGenerator::new().with_minification(minify)),
    )?;
    flow.process()
}

/// Validates the recipes collection without writing any output.
fn run_check(config_file: &Path, root: &Path) -> Result<()> {
    let config = load_config(config_file, root)?;
    let registry = CollectionRegistry::cookbook();
    let documents = registry.load(RECIPES, &config.content_dir)?;

    println!("{} recipe documents validated", documents.len());
    Ok(())
}

/// Prints the full stylesheet for a preset, without dead-class elimination.
fn run_theme(preset: &str) -> Result<()> {
    let preset: ThemePreset = preset.parse()?;
    let theme = Theme::preset(preset);
    let stylesheet = css::generate_all(&theme)?;

    print!("{stylesheet}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ArgMatches;

    fn get_matches(args: Vec<&str>) -> ArgMatches {
        build().get_matches_from(args)
    }

    #[test]
    fn test_build_command() {
        let matches = get_matches(vec![
            "cookbookflow",
            "build",
            "--config",
            "cookbook.toml",
            "--root",
            "site",
            "--minify",
        ]);
        let build_cmd = matches.subcommand_matches("build").unwrap();

        assert_eq!(
            build_cmd.get_one::<PathBuf>("config").unwrap().as_path(),
            Path::new("cookbook.toml")
        );
        assert_eq!(
            build_cmd.get_one::<PathBuf>("root").unwrap().as_path(),
            Path::new("site")
        );
        assert!(build_cmd.get_flag("minify"));
    }

    #[test]
    fn test_check_command_defaults() {
        let matches = get_matches(vec!["cookbookflow", "check"]);
        let check_cmd = matches.subcommand_matches("check").unwrap();

        assert_eq!(
            check_cmd.get_one::<PathBuf>("config").unwrap().as_path(),
            Path::new(DEFAULT_CONFIG_FILE)
        );
    }

    #[test]
    fn test_theme_command_rejects_unknown_preset() {
        let result =
            build().try_get_matches_from(vec!["cookbookflow", "theme", "--preset", "neon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_theme_command_accepts_alternate_preset() {
        let matches = get_matches(vec!["cookbookflow", "theme", "--preset", "plain-fixed"]);
        let theme_cmd = matches.subcommand_matches("theme").unwrap();
        assert_eq!(
            theme_cmd.get_one::<String>("preset").unwrap(),
            "plain-fixed"
        );
    }

    #[test]
    fn test_rebase_leaves_absolute_paths() {
        let mut config = SiteConfig::default();
        config.output_dir = PathBuf::from("/tmp/dist");
        rebase(&mut config, Path::new("site"));

        assert_eq!(config.output_dir, PathBuf::from("/tmp/dist"));
        assert_eq!(config.content_dir, Path::new("site").join("src/content"));
    }
}
