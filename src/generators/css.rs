//! # Utility Stylesheet Generation
//!
//! Turns the active theme's design tokens into utility classes following the
//! host convention: one single-purpose class per token (`bg-sienna-light`,
//! `font-display`, `text-fluid-base`, `p-card`, `max-w-prose`,
//! `rounded-card`, `shadow-card`).
//!
//! Generation is usage-driven: source files matched by the theme's `content`
//! patterns are scanned for candidate class names, and a class is emitted
//! into the stylesheet iff at least one scanned source references it. Token
//! values are substituted literally; nothing validates them as CSS.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::debug;

use crate::core::error::{BuildError, Result};
use crate::theme::{Theme, ThemeTokens};

/// Builds the full class-name to declarations mapping for a token set.
///
/// Two tokens that would generate the same class name are a configuration
/// error: the build has no way to decide which value wins.
pub fn utility_classes(tokens: &ThemeTokens) -> Result<BTreeMap<String, String>> {
    let mut classes = BTreeMap::new();

    for (name, token) in &tokens.colors {
        for (suffix, value) in token.shades(name) {
            insert(&mut classes, format!("bg-{suffix}"), format!("background-color: {value};"))?;
            insert(&mut classes, format!("text-{suffix}"), format!("color: {value};"))?;
            insert(
                &mut classes,
                format!("border-{suffix}"),
                format!("border-color: {value};"),
            )?;
        }
    }

    for (role, stack) in &tokens.font_family {
        insert(
            &mut classes,
            format!("font-{role}"),
            format!("font-family: {};", format_font_stack(stack)),
        )?;
    }

    for (key, font_size) in &tokens.font_size {
        let mut declarations = format!("font-size: {};", font_size.size);
        if let Some(line_height) = &font_size.line_height {
            declarations.push_str(&format!(" line-height: {line_height};"));
        }
        if let Some(letter_spacing) = &font_size.letter_spacing {
            declarations.push_str(&format!(" letter-spacing: {letter_spacing};"));
        }
        insert(&mut classes, format!("text-{key}"), declarations)?;
    }

    for (key, value) in &tokens.spacing {
        insert(&mut classes, format!("p-{key}"), format!("padding: {value};"))?;
        insert(&mut classes, format!("m-{key}"), format!("margin: {value};"))?;
        insert(&mut classes, format!("gap-{key}"), format!("gap: {value};"))?;
    }

    for (key, value) in &tokens.max_width {
        insert(&mut classes, format!("max-w-{key}"), format!("max-width: {value};"))?;
    }

    for (key, value) in &tokens.border_radius {
        insert(
            &mut classes,
            format!("rounded-{key}"),
            format!("border-radius: {value};"),
        )?;
    }

    for (key, value) in &tokens.box_shadow {
        insert(&mut classes, format!("shadow-{key}"), format!("box-shadow: {value};"))?;
    }

    Ok(classes)
}

/// Collects candidate class names from a piece of source text.
///
/// Candidates are maximal runs of the characters a generated class name can
/// contain; everything else (markup, quotes, whitespace) separates them.
pub fn collect_candidates(text: &str, into: &mut BTreeSet<String>) {
    for token in text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_')) {
        if !token.is_empty() {
            _ = into.insert(token.to_string());
        }
    }
}

/// Scans every source file under `root` matched by the theme's `content`
/// patterns and returns the candidate class names found.
pub fn scan_sources(root: &Path, theme: &Theme) -> Result<BTreeSet<String>> {
    if !root.is_dir() {
        return Err(BuildError::config(
            format!("source directory does not exist: {}", root.display()),
            Some(root.to_path_buf()),
        ));
    }

    let extensions = theme.scan_extensions();
    let mut candidates = BTreeSet::new();
    scan_dir(root, &extensions, &mut candidates)?;
    debug!("scanned {} candidate class names", candidates.len());
    Ok(candidates)
}

fn scan_dir(dir: &Path, extensions: &BTreeSet<String>, into: &mut BTreeSet<String>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| BuildError::io(dir.to_path_buf(), e))? {
        let entry = entry.map_err(|e| BuildError::io(dir.to_path_buf(), e))?;
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, extensions, into)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(ext))
        {
            let text = fs::read_to_string(&path).map_err(|e| BuildError::io(path.clone(), e))?;
            collect_candidates(&text, into);
        }
    }
    Ok(())
}

/// Generates the stylesheet for a theme, keeping only the classes present in
/// the referenced set.
pub fn generate(theme: &Theme, referenced: &BTreeSet<String>) -> Result<String> {
    let classes = utility_classes(&theme.tokens)?;
    let mut css = String::from("/*! generated by cookbookflow */\n");
    let mut emitted = 0usize;
    for (name, declarations) in &classes {
        if referenced.contains(name) {
            css.push_str(&format!(".{name} {{ {declarations} }}\n"));
            emitted += 1;
        }
    }
    debug!("emitted {emitted} of {} utility classes", classes.len());
    Ok(css)
}

/// Generates the stylesheet with every class of the theme, skipping
/// dead-class elimination. Used for inspection.
pub fn generate_all(theme: &Theme) -> Result<String> {
    let classes = utility_classes(&theme.tokens)?;
    let mut css = String::from("/*! generated by cookbookflow */\n");
    for (name, declarations) in &classes {
        css.push_str(&format!(".{name} {{ {declarations} }}\n"));
    }
    Ok(css)
}

fn insert(classes: &mut BTreeMap<String, String>, name: String, declarations: String) -> Result<()> {
    if classes.contains_key(&name) {
        return Err(BuildError::config(
            format!("theme tokens generate the utility class `{name}` more than once"),
            None,
        ));
    }
    _ = classes.insert(name, declarations);
    Ok(())
}

/// Formats a font stack, quoting family names that contain whitespace.
fn format_font_stack(stack: &[String]) -> String {
    stack
        .iter()
        .map(|family| {
            if family.chars().any(char::is_whitespace) {
                format!("'{family}'")
            } else {
                family.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
