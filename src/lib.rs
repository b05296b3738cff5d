// Copyright © 2026 CookbookFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # CookbookFlow Library
//!
//! CookbookFlow builds the Lemons family recipe cookbook as a static
//! website. The build consumes three declarative inputs - the site
//! configuration, the recipes content collection, and a theme token set -
//! validates every recipe document against a strict schema, generates a
//! usage-trimmed utility stylesheet from the active theme, and writes fully
//! pre-rendered pages.

#![doc = include_str!("../README.md")]
#![crate_name = "cookbookflow"]
#![crate_type = "lib"]

use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value as JsonValue;

use crate::content::{Category, RecipeDocument};
use crate::core::config::{Integration, SiteConfig};
use crate::core::error::{BuildError, Result};
use crate::generators::css;
use crate::render::STYLESHEET_PATH;
use crate::theme::Theme;

/// Module containing core utilities, such as configuration and error handling.
pub mod core;

/// Provides command-line interface utilities.
pub mod cli;

/// Provides content collection loading and schema validation.
pub mod content;

/// Provides output generation utilities.
pub mod generators;

/// Provides page rendering utilities.
pub mod render;

/// Provides theme design-token definitions.
pub mod theme;

pub use crate::content::{CollectionRegistry, RecipeFrontMatter, RecipeSchema};
pub use crate::core::config::{BasePath, ConfigBuilder, OutputMode};
pub use crate::generators::HtmlFileGenerator;
pub use crate::render::CookbookPageRenderer;
pub use crate::theme::{ThemePreset, ThemeTokens};

/// Trait for page rendering implementations.
///
/// A renderer turns validated documents into complete HTML pages. Every
/// internal link must be produced through the site configuration so the
/// configured base path is applied.
pub trait PageRenderer: Send + Sync + std::fmt::Debug {
    /// Renders one recipe document as a page.
    fn render_recipe(&self, document: &RecipeDocument, site: &SiteConfig) -> Result<String>;

    /// Renders the index page of one category.
    fn render_category(
        &self,
        category: Category,
        documents: &[&RecipeDocument],
        site: &SiteConfig,
    ) -> Result<String>;

    /// Renders the site home page.
    fn render_home(&self, documents: &[RecipeDocument], site: &SiteConfig) -> Result<String>;
}

/// Trait for output generation implementations.
///
/// Defines methods for writing generated content to the output tree.
pub trait OutputGenerator: Send + Sync + std::fmt::Debug {
    /// Writes content to the given path.
    ///
    /// # Arguments
    /// * `content` - The content to be written.
    /// * `path` - The output file path.
    /// * `options` - Optional settings for generation.
    fn generate(&self, content: &str, path: &Path, options: Option<&JsonValue>) -> Result<()>;

    /// Validates the path and options without writing.
    fn validate(&self, path: &Path, options: Option<&JsonValue>) -> Result<()>;
}

/// The cookbook build pipeline.
///
/// Wires the site configuration, the collection registry, the active theme,
/// and the rendering/output seams together. A build validates everything
/// before it writes anything: an invalid document means no output at all.
#[derive(Debug)]
pub struct CookbookFlow {
    config: SiteConfig,
    registry: CollectionRegistry,
    theme: Theme,
    renderer: Box<dyn PageRenderer>,
    generator: Box<dyn OutputGenerator>,
}

impl CookbookFlow {
    /// Creates a new pipeline instance.
    ///
    /// The configuration is validated and the theme preset it names is
    /// resolved here; the content directory must already exist.
    pub fn new(
        config: SiteConfig,
        registry: CollectionRegistry,
        renderer: Box<dyn PageRenderer>,
        generator: Box<dyn OutputGenerator>,
    ) -> Result<Self> {
        config.validate()?;

        if !config.content_dir.is_dir() {
            return Err(BuildError::config(
                format!(
                    "content directory does not exist: {}",
                    config.content_dir.display()
                ),
                Some(config.content_dir.clone()),
            ));
        }

        let theme = Theme::preset(config.theme.preset);

        Ok(Self {
            config,
            registry,
            theme,
            renderer,
            generator,
        })
    }

    /// Creates a pipeline with the built-in renderer and file generator.
    pub fn with_defaults(config: SiteConfig) -> Result<Self> {
        Self::new(
            config,
            CollectionRegistry::cookbook(),
            Box::new(CookbookPageRenderer::new()),
            Box::new(HtmlFileGenerator::new()),
        )
    }

    /// The active theme resolved from the configuration.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Runs the build: load and validate the recipes collection, render all
    /// pages, generate the stylesheet, and write the output tree.
    pub fn process(&self) -> Result<()> {
        let documents = self
            .registry
            .load(content::RECIPES, &self.config.content_dir)?;

        let mut pages: Vec<(PathBuf, String)> = Vec::new();
        pages.push((
            PathBuf::from("index.html"),
            self.renderer.render_home(&documents, &self.config)?,
        ));

        for category in Category::ALL {
            let members: Vec<&RecipeDocument> = documents
                .iter()
                .filter(|document| document.front_matter.category == category)
                .collect();
            pages.push((
                PathBuf::from(category.slug()).join("index.html"),
                self.renderer
                    .render_category(category, &members, &self.config)?,
            ));
        }

        for document in &documents {
            pages.push((
                PathBuf::from("recipes")
                    .join(&document.slug)
                    .join("index.html"),
                self.renderer.render_recipe(document, &self.config)?,
            ));
        }

        if self.config.has_integration(Integration::Tailwind) {
            let mut referenced = css::scan_sources(&self.config.source_dir, &self.theme)?;
            // The rendered pages are sources too: the built-in shell's
            // classes must survive elimination.
            for (_, page) in &pages {
                css::collect_candidates(page, &mut referenced);
            }
            let stylesheet = css::generate(&self.theme, &referenced)?;
            pages.push((PathBuf::from(STYLESHEET_PATH), stylesheet));
        }

        for (relative, contents) in &pages {
            let path = self.config.output_dir.join(relative);
            self.generator.generate(contents, &path, None)?;
        }

        info!(
            "built {} pages for {} recipes into {}",
            pages.len(),
            documents.len(),
            self.config.output_dir.display()
        );
        Ok(())
    }
}
