//! # HTML Output Generation
//!
//! Writes rendered pages and the generated stylesheet to the output
//! directory. The generator creates parent directories as needed and can
//! minify HTML output via the `minify-html` crate; non-HTML files are
//! written verbatim.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use log::debug;
use minify_html::{minify, Cfg};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::error::{BuildError, Result};
use crate::OutputGenerator;

/// Configuration options for file output.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Controls HTML minification.
    pub minify: bool,
}

/// Output generator that writes pages and assets to disk.
#[derive(Debug, Clone, Default)]
pub struct HtmlFileGenerator {
    config: Arc<RwLock<OutputOptions>>,
}

impl HtmlFileGenerator {
    /// Creates a new generator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables HTML minification.
    #[must_use]
    pub fn with_minification(self, enable: bool) -> Self {
        self.config.write().minify = enable;
        self
    }

    /// Minifies HTML content using the `minify-html` crate.
    fn minify_html(&self, content: &str, path: &Path) -> Result<String> {
        let cfg = Cfg {
            minify_css: true,
            minify_js: true,
            ..Cfg::default()
        };
        String::from_utf8(minify(content.as_bytes(), &cfg)).map_err(|e| {
            BuildError::output_generation(
                "HTML minification produced invalid UTF-8",
                path.to_path_buf(),
                Some(Box::new(e)),
            )
        })
    }
}

impl OutputGenerator for HtmlFileGenerator {
    fn generate(&self, content: &str, path: &Path, options: Option<&JsonValue>) -> Result<()> {
        self.validate(path, options)?;

        let minify_enabled = options
            .and_then(|opts| opts.get("minify"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(self.config.read().minify);

        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

        let output = if minify_enabled && is_html {
            self.minify_html(content, path)?
        } else {
            content.to_string()
        };

        let file = File::create(path).map_err(|e| BuildError::io(path.to_path_buf(), e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(output.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| BuildError::io(path.to_path_buf(), e))?;

        debug!("wrote {}", path.display());
        Ok(())
    }

    fn validate(&self, path: &Path, options: Option<&JsonValue>) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| BuildError::io(parent.to_path_buf(), e))?;
            }
        }

        if let Some(opts) = options {
            if let Some(minify_value) = opts.get("minify") {
                if !minify_value.is_boolean() {
                    return Err(BuildError::output_generation(
                        "the `minify` option must be a boolean",
                        path.to_path_buf(),
                        None,
                    ));
                }
            }
        }

        Ok(())
    }
}
