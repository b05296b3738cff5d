//! # Theme Configuration Module
//!
//! Design tokens for the cookbook's visual identity: named colors, font
//! stacks, type sizes, spacing, content widths, radii, and shadows. Tokens
//! extend a base utility-class system - each token becomes one or more
//! generated utility classes (see [`crate::generators::css`]), scoped by the
//! theme's `content` glob patterns so only matched source files are scanned
//! for class usage.
//!
//! Two token sets ship with the tool:
//!
//! - [`ThemePreset::WarmFluid`] - the warm cookbook palette with `clamp()`
//!   based fluid type scaling. This is the authoritative default.
//! - [`ThemePreset::PlainFixed`] - a plain palette with fixed rem sizing,
//!   kept as a named alternate.
//!
//! Exactly one preset governs a build; the other stays dormant. Token values
//! are literal CSS and are not validated here - a malformed value surfaces
//! when the stylesheet is generated, not at configuration load.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{BuildError, Result};

/// Glob patterns identifying which source files may reference utility
/// classes.
pub const DEFAULT_CONTENT: &[&str] = &["./src/**/*.{astro,html,js,jsx,md,mdx,svelte,ts,tsx,vue}"];

/// Names the theme token set that governs a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    /// Warm palette, fluid `clamp()` type scale. The canonical cookbook
    /// theme.
    #[default]
    WarmFluid,
    /// Plain palette, fixed rem sizing. Alternate preset, inactive unless
    /// selected.
    PlainFixed,
}

impl ThemePreset {
    /// The configuration name of this preset.
    pub fn name(self) -> &'static str {
        match self {
            ThemePreset::WarmFluid => "warm-fluid",
            ThemePreset::PlainFixed => "plain-fixed",
        }
    }
}

impl fmt::Display for ThemePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemePreset {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "warm-fluid" => Ok(ThemePreset::WarmFluid),
            "plain-fixed" => Ok(ThemePreset::PlainFixed),
            other => Err(BuildError::config(
                format!("unknown theme preset `{other}`; expected `warm-fluid` or `plain-fixed`"),
                None,
            )),
        }
    }
}

/// A color token: either a single value or a DEFAULT/light/dark scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorToken {
    /// One literal color value.
    Value(String),
    /// A named scale; the `DEFAULT` key maps to the bare token name.
    Scale(BTreeMap<String, String>),
}

impl ColorToken {
    /// Expands the token into `(class-suffix, value)` pairs.
    ///
    /// A flat `cream` token yields `[("cream", "#FDF8F3")]`; a `sienna`
    /// scale yields `sienna` (the DEFAULT shade), `sienna-dark`, and
    /// `sienna-light`.
    pub fn shades<'a>(&'a self, name: &str) -> Vec<(String, &'a str)> {
        match self {
            ColorToken::Value(value) => vec![(name.to_string(), value.as_str())],
            ColorToken::Scale(scale) => scale
                .iter()
                .map(|(shade, value)| {
                    let suffix = if shade == "DEFAULT" {
                        name.to_string()
                    } else {
                        format!("{name}-{shade}")
                    };
                    (suffix, value.as_str())
                })
                .collect(),
        }
    }
}

/// A type-size token: the font size plus optional auxiliary properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSize {
    /// The `font-size` value.
    pub size: String,
    /// Optional `line-height`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    /// Optional `letter-spacing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
}

/// The nested design-token mapping: token category to token name to literal
/// CSS value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTokens {
    /// Color tokens.
    pub colors: BTreeMap<String, ColorToken>,
    /// Font-family roles and their stacks.
    pub font_family: BTreeMap<String, Vec<String>>,
    /// Type-size tokens.
    pub font_size: BTreeMap<String, FontSize>,
    /// Spacing tokens.
    pub spacing: BTreeMap<String, String>,
    /// Content-width tokens.
    pub max_width: BTreeMap<String, String>,
    /// Corner-radius tokens.
    pub border_radius: BTreeMap<String, String>,
    /// Shadow tokens.
    pub box_shadow: BTreeMap<String, String>,
}

/// A theme: design tokens plus the glob patterns scoping which source files
/// are scanned for utility-class usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Glob patterns for source files that may reference utility classes.
    pub content: Vec<String>,
    /// The design tokens.
    pub tokens: ThemeTokens,
}

impl Theme {
    /// Resolves a preset to its theme.
    pub fn preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::WarmFluid => Self::warm_fluid(),
            ThemePreset::PlainFixed => Self::plain_fixed(),
        }
    }

    /// The warm cookbook theme with fluid typography.
    pub fn warm_fluid() -> Self {
        Self {
            content: DEFAULT_CONTENT.iter().map(|s| s.to_string()).collect(),
            tokens: warm_fluid_tokens(),
        }
    }

    /// The plain theme with fixed sizing.
    pub fn plain_fixed() -> Self {
        Self {
            content: DEFAULT_CONTENT.iter().map(|s| s.to_string()).collect(),
            tokens: plain_fixed_tokens(),
        }
    }

    /// The file extensions the `content` patterns match, for the class
    /// scanner. Matching is by extension within the configured source
    /// directory.
    pub fn scan_extensions(&self) -> BTreeSet<String> {
        let mut extensions = BTreeSet::new();
        for pattern in &self.content {
            for ext in pattern_extensions(pattern) {
                _ = extensions.insert(ext);
            }
        }
        extensions
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::warm_fluid()
    }
}

/// Extracts the file extensions a glob pattern matches, expanding a trailing
/// brace set (`*.{md,mdx}`) into its alternatives.
fn pattern_extensions(pattern: &str) -> Vec<String> {
    let file_part = pattern.rsplit('/').next().unwrap_or(pattern);
    if let (Some(open), Some(close)) = (file_part.find('{'), file_part.rfind('}')) {
        if open < close {
            return file_part[open + 1..close]
                .split(',')
                .map(|ext| ext.trim().to_string())
                .filter(|ext| !ext.is_empty())
                .collect();
        }
    }
    match file_part.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('*') => vec![ext.to_string()],
        _ => Vec::new(),
    }
}

// Token set literals. Values are CSS, copied verbatim into the generated
// stylesheet.

fn warm_fluid_tokens() -> ThemeTokens {
    let mut colors = BTreeMap::new();
    _ = colors.insert(key("cream"), flat("#FDF8F3"));
    _ = colors.insert(key("ivory"), flat("#FAF7F2"));
    _ = colors.insert(key("linen"), flat("#F5F0E8"));
    _ = colors.insert(key("ink"), flat("#2C2416"));
    _ = colors.insert(key("ink-light"), flat("#4A3F2F"));
    _ = colors.insert(key("ink-muted"), flat("#7A6F5F"));
    _ = colors.insert(
        key("sienna"),
        scale(&[("DEFAULT", "#A0522D"), ("light", "#C67B4E"), ("dark", "#7A3E22")]),
    );
    _ = colors.insert(
        key("sage"),
        scale(&[("DEFAULT", "#5F7161"), ("light", "#8A9A8C"), ("dark", "#3D4A3F")]),
    );
    _ = colors.insert(key("rule"), flat("#E8E2D9"));
    _ = colors.insert(key("rule-dark"), flat("#D4CCC0"));

    let mut font_family = BTreeMap::new();
    _ = font_family.insert(key("display"), stack(&["Playfair Display", "Georgia", "serif"]));
    _ = font_family.insert(key("body"), stack(&["Crimson Pro", "Georgia", "serif"]));
    _ = font_family.insert(key("ui"), stack(&["Inter", "system-ui", "sans-serif"]));

    let mut font_size = BTreeMap::new();
    _ = font_size.insert(
        key("fluid-xs"),
        size("clamp(0.75rem, 0.7rem + 0.25vw, 0.875rem)", Some("1.5"), None),
    );
    _ = font_size.insert(
        key("fluid-sm"),
        size("clamp(0.875rem, 0.8rem + 0.35vw, 1rem)", Some("1.6"), None),
    );
    _ = font_size.insert(
        key("fluid-base"),
        size("clamp(1rem, 0.9rem + 0.5vw, 1.125rem)", Some("1.7"), None),
    );
    _ = font_size.insert(
        key("fluid-lg"),
        size("clamp(1.125rem, 1rem + 0.6vw, 1.25rem)", Some("1.6"), None),
    );
    _ = font_size.insert(
        key("fluid-xl"),
        size("clamp(1.25rem, 1.1rem + 0.75vw, 1.5rem)", Some("1.5"), None),
    );
    _ = font_size.insert(
        key("display-sm"),
        size("clamp(1.5rem, 1.2rem + 1.5vw, 2rem)", Some("1.3"), None),
    );
    _ = font_size.insert(
        key("display-md"),
        size("clamp(1.875rem, 1.5rem + 1.875vw, 2.5rem)", Some("1.2"), None),
    );
    _ = font_size.insert(
        key("display-lg"),
        size(
            "clamp(2.25rem, 1.75rem + 2.5vw, 3.5rem)",
            Some("1.15"),
            Some("-0.01em"),
        ),
    );
    _ = font_size.insert(
        key("display-xl"),
        size("clamp(3rem, 2rem + 5vw, 5rem)", Some("1.1"), Some("-0.02em")),
    );

    let mut spacing = BTreeMap::new();
    _ = spacing.insert(key("content"), value("65ch"));
    _ = spacing.insert(key("content-wide"), value("75ch"));
    _ = spacing.insert(key("section-sm"), value("clamp(2rem, 4vw, 3rem)"));
    _ = spacing.insert(key("section-md"), value("clamp(3rem, 6vw, 5rem)"));
    _ = spacing.insert(key("section-lg"), value("clamp(4rem, 8vw, 7rem)"));
    _ = spacing.insert(key("card"), value("1.5rem"));
    _ = spacing.insert(key("card-lg"), value("2rem"));

    let mut max_width = BTreeMap::new();
    _ = max_width.insert(key("prose"), value("65ch"));
    _ = max_width.insert(key("prose-wide"), value("75ch"));

    let mut border_radius = BTreeMap::new();
    _ = border_radius.insert(key("card"), value("0.5rem"));

    let mut box_shadow = BTreeMap::new();
    _ = box_shadow.insert(
        key("card"),
        value("0 1px 3px rgba(44, 36, 22, 0.08), 0 1px 2px rgba(44, 36, 22, 0.06)"),
    );
    _ = box_shadow.insert(
        key("card-hover"),
        value("0 4px 6px rgba(44, 36, 22, 0.1), 0 2px 4px rgba(44, 36, 22, 0.06)"),
    );

    ThemeTokens {
        colors,
        font_family,
        font_size,
        spacing,
        max_width,
        border_radius,
        box_shadow,
    }
}

fn plain_fixed_tokens() -> ThemeTokens {
    let mut colors = BTreeMap::new();
    _ = colors.insert(key("paper"), flat("#FFFFFF"));
    _ = colors.insert(key("smoke"), flat("#F4F4F4"));
    _ = colors.insert(key("charcoal"), flat("#222222"));
    _ = colors.insert(key("slate"), flat("#555555"));
    _ = colors.insert(
        key("brick"),
        scale(&[("DEFAULT", "#9A3B26"), ("light", "#C05C3F"), ("dark", "#6E2A1B")]),
    );
    _ = colors.insert(key("hairline"), flat("#DDDDDD"));

    let mut font_family = BTreeMap::new();
    _ = font_family.insert(key("heading"), stack(&["Georgia", "serif"]));
    _ = font_family.insert(key("text"), stack(&["Georgia", "serif"]));
    _ = font_family.insert(key("ui"), stack(&["Helvetica", "Arial", "sans-serif"]));

    let mut font_size = BTreeMap::new();
    _ = font_size.insert(key("xs"), size("0.75rem", Some("1.5"), None));
    _ = font_size.insert(key("sm"), size("0.875rem", Some("1.6"), None));
    _ = font_size.insert(key("base"), size("1rem", Some("1.7"), None));
    _ = font_size.insert(key("lg"), size("1.125rem", Some("1.6"), None));
    _ = font_size.insert(key("xl"), size("1.25rem", Some("1.5"), None));
    _ = font_size.insert(key("title-sm"), size("1.5rem", Some("1.3"), None));
    _ = font_size.insert(key("title-md"), size("2rem", Some("1.2"), None));
    _ = font_size.insert(key("title-lg"), size("2.5rem", Some("1.15"), Some("-0.01em")));
    _ = font_size.insert(key("title-xl"), size("3rem", Some("1.1"), Some("-0.02em")));

    let mut spacing = BTreeMap::new();
    _ = spacing.insert(key("gutter"), value("1rem"));
    _ = spacing.insert(key("gutter-lg"), value("2rem"));
    _ = spacing.insert(key("block-sm"), value("2rem"));
    _ = spacing.insert(key("block-md"), value("3.5rem"));
    _ = spacing.insert(key("block-lg"), value("5rem"));
    _ = spacing.insert(key("card"), value("1.25rem"));
    _ = spacing.insert(key("card-lg"), value("1.75rem"));

    let mut max_width = BTreeMap::new();
    _ = max_width.insert(key("measure"), value("60ch"));
    _ = max_width.insert(key("measure-wide"), value("72ch"));

    let mut border_radius = BTreeMap::new();
    _ = border_radius.insert(key("card"), value("0.25rem"));

    let mut box_shadow = BTreeMap::new();
    _ = box_shadow.insert(key("card"), value("0 1px 2px rgba(0, 0, 0, 0.1)"));

    ThemeTokens {
        colors,
        font_family,
        font_size,
        spacing,
        max_width,
        border_radius,
        box_shadow,
    }
}

fn key(name: &str) -> String {
    name.to_string()
}

fn value(v: &str) -> String {
    v.to_string()
}

fn flat(v: &str) -> ColorToken {
    ColorToken::Value(v.to_string())
}

fn scale(shades: &[(&str, &str)]) -> ColorToken {
    ColorToken::Scale(
        shades
            .iter()
            .map(|(shade, v)| (shade.to_string(), v.to_string()))
            .collect(),
    )
}

fn stack(fonts: &[&str]) -> Vec<String> {
    fonts.iter().map(|f| f.to_string()).collect()
}

fn size(v: &str, line_height: Option<&str>, letter_spacing: Option<&str>) -> FontSize {
    FontSize {
        size: v.to_string(),
        line_height: line_height.map(str::to_string),
        letter_spacing: letter_spacing.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_is_warm_fluid() {
        assert_eq!(ThemePreset::default(), ThemePreset::WarmFluid);
        assert_eq!(Theme::default(), Theme::warm_fluid());
    }

    #[test]
    fn test_preset_parse_round_trip() {
        for preset in [ThemePreset::WarmFluid, ThemePreset::PlainFixed] {
            assert_eq!(preset.name().parse::<ThemePreset>().unwrap(), preset);
        }
        assert!("neon".parse::<ThemePreset>().is_err());
    }

    #[test]
    fn test_warm_fluid_carries_original_palette() {
        let theme = Theme::warm_fluid();
        let sienna = theme.tokens.colors.get("sienna").unwrap();
        match sienna {
            ColorToken::Scale(scale) => {
                assert_eq!(scale.get("DEFAULT").map(String::as_str), Some("#A0522D"));
                assert_eq!(scale.get("light").map(String::as_str), Some("#C67B4E"));
                assert_eq!(scale.get("dark").map(String::as_str), Some("#7A3E22"));
            }
            other => panic!("sienna should be a scale, got {other:?}"),
        }
        assert_eq!(
            theme.tokens.colors.get("cream"),
            Some(&ColorToken::Value("#FDF8F3".to_string()))
        );
    }

    #[test]
    fn test_shades_expand_default_to_bare_name() {
        let sienna = scale(&[("DEFAULT", "#A0522D"), ("light", "#C67B4E")]);
        let shades = sienna.shades("sienna");
        assert!(shades.contains(&("sienna".to_string(), "#A0522D")));
        assert!(shades.contains(&("sienna-light".to_string(), "#C67B4E")));
    }

    #[test]
    fn test_fluid_sizes_carry_auxiliary_properties() {
        let tokens = warm_fluid_tokens();
        let display_lg = tokens.font_size.get("display-lg").unwrap();
        assert!(display_lg.size.starts_with("clamp("));
        assert_eq!(display_lg.line_height.as_deref(), Some("1.15"));
        assert_eq!(display_lg.letter_spacing.as_deref(), Some("-0.01em"));
    }

    #[test]
    fn test_plain_fixed_uses_fixed_sizes_and_other_names() {
        let tokens = plain_fixed_tokens();
        assert!(tokens.font_size.values().all(|fs| !fs.size.contains("clamp")));
        assert!(tokens.colors.contains_key("paper"));
        assert!(!tokens.colors.contains_key("cream"));
        assert_ne!(warm_fluid_tokens(), tokens);
    }

    #[test]
    fn test_scan_extensions_from_brace_pattern() {
        let theme = Theme::warm_fluid();
        let extensions = theme.scan_extensions();
        for ext in ["astro", "html", "md", "mdx", "vue"] {
            assert!(extensions.contains(ext), "missing {ext}");
        }
    }

    #[test]
    fn test_pattern_extensions_plain_suffix() {
        assert_eq!(pattern_extensions("./pages/*.html"), vec!["html"]);
        assert!(pattern_extensions("./pages/*").is_empty());
    }

    #[test]
    fn test_color_token_serde_shapes() {
        let flat_json = serde_json::to_string(&flat("#FDF8F3")).unwrap();
        assert_eq!(flat_json, "\"#FDF8F3\"");

        let parsed: ColorToken =
            serde_json::from_str("{\"DEFAULT\":\"#A0522D\",\"light\":\"#C67B4E\"}").unwrap();
        assert!(matches!(parsed, ColorToken::Scale(_)));
    }
}
