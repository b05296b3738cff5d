//! # Content Collections Module
//!
//! This module implements the cookbook's content layer: one named collection
//! of recipe documents, each validated against a strict front-matter schema
//! before it is usable by the rendering layer.
//!
//! ## Key Features
//!
//! - **Closed category set**: the six recipe categories are an enum, so an
//!   invalid category is unrepresentable once a document has validated
//! - **Strict front matter**: `title` (required text), `category` (required,
//!   one of six values), `story` (optional text); anything else is rejected
//! - **Fail-fast loading**: the first invalid document halts the build with
//!   the offending file and field
//!
//! Validation is pure: it reads nothing but the document text, and documents
//! are never mutated after loading.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_yml::{Mapping, Value as YamlValue};

use crate::core::error::{BuildError, Result};

/// Name of the recipes collection.
pub const RECIPES: &str = "recipes";

/// File extensions a collection document may use.
const DOCUMENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// The closed set of recipe categories.
///
/// Adding a category is a schema change, not a content change: content files
/// can only name one of these six values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Cakes, pies, and frostings.
    CakesPiesFrostings,
    /// Candies, cookies, and confections.
    CandiesCookiesConfections,
    /// Main dishes, meats, and vegetables.
    MainDishesMeatsVegetables,
    /// Quickbreads, muffins, and pancakes.
    QuickbreadsMuffinsPancakes,
    /// Salads.
    Salads,
    /// Yeast breads, rolls, and sweet dough.
    YeastBreadsRollsSweetDough,
}

impl Category {
    /// Every category, in slug order.
    pub const ALL: [Category; 6] = [
        Category::CakesPiesFrostings,
        Category::CandiesCookiesConfections,
        Category::MainDishesMeatsVegetables,
        Category::QuickbreadsMuffinsPancakes,
        Category::Salads,
        Category::YeastBreadsRollsSweetDough,
    ];

    /// The slug used in front matter and in generated URLs.
    pub fn slug(self) -> &'static str {
        match self {
            Category::CakesPiesFrostings => "cakes-pies-frostings",
            Category::CandiesCookiesConfections => "candies-cookies-confections",
            Category::MainDishesMeatsVegetables => "main-dishes-meats-vegetables",
            Category::QuickbreadsMuffinsPancakes => "quickbreads-muffins-pancakes",
            Category::Salads => "salads",
            Category::YeastBreadsRollsSweetDough => "yeast-breads-rolls-sweet-dough",
        }
    }

    /// The human-readable name shown on category pages.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::CakesPiesFrostings => "Cakes, Pies, Frostings",
            Category::CandiesCookiesConfections => "Candies, Cookies, Confections",
            Category::MainDishesMeatsVegetables => "Main Dishes, Meats, Vegetables",
            Category::QuickbreadsMuffinsPancakes => "Quickbreads, Muffins, Pancakes",
            Category::Salads => "Salads",
            Category::YeastBreadsRollsSweetDough => "Yeast Breads, Rolls, Sweet Dough",
        }
    }

    /// Parses a category slug, listing the valid options on mismatch.
    pub fn parse(slug: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.slug() == slug)
            .ok_or_else(|| {
                BuildError::validation(
                    "category",
                    format!(
                        "unknown category `{slug}`; expected one of {}",
                        Self::options_list()
                    ),
                )
            })
    }

    /// The six valid slugs, backtick-quoted and comma-separated, for error
    /// messages.
    pub fn options_list() -> String {
        Self::ALL
            .iter()
            .map(|category| format!("`{}`", category.slug()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Category::parse(s)
    }
}

/// The validated front matter of a recipe document.
///
/// Once constructed, the invariants hold for the lifetime of the build:
/// `title` is non-empty text, `category` is one of the six closed values,
/// and `story` is either absent or text - never null, never empty-by-default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFrontMatter {
    /// Recipe title.
    pub title: String,
    /// Which of the six category pages the recipe appears on.
    pub category: Category,
    /// Optional family story accompanying the recipe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

impl RecipeFrontMatter {
    /// Validates a raw front-matter record against the recipe schema.
    ///
    /// An empty string is treated as an absent record, which fails on the
    /// missing `title`.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let value: YamlValue = serde_yml::from_str(raw)
            .map_err(|e| BuildError::validation("front matter", format!("invalid YAML: {e}")))?;

        let mapping = match value {
            YamlValue::Null => Mapping::new(),
            YamlValue::Mapping(mapping) => mapping,
            other => {
                return Err(BuildError::validation(
                    "front matter",
                    format!("expected a key-value mapping, got {}", yaml_type(&other)),
                ));
            }
        };

        let mut fields: BTreeMap<&str, &YamlValue> = BTreeMap::new();
        for (key, value) in &mapping {
            let name = match key {
                YamlValue::String(name) => name.as_str(),
                other => {
                    return Err(BuildError::validation(
                        "front matter",
                        format!("field names must be text, got {}", yaml_type(other)),
                    ));
                }
            };
            if !matches!(name, "title" | "category" | "story") {
                return Err(BuildError::validation(
                    name,
                    "unknown field; recipes accept `title`, `category`, and `story`",
                ));
            }
            _ = fields.insert(name, value);
        }

        let title = match fields.get("title").copied() {
            None => {
                return Err(BuildError::validation(
                    "title",
                    "missing required field; every recipe needs a text title",
                ));
            }
            Some(YamlValue::String(title)) if title.trim().is_empty() => {
                return Err(BuildError::validation("title", "must not be empty"));
            }
            Some(YamlValue::String(title)) => title.clone(),
            Some(other) => {
                return Err(BuildError::validation(
                    "title",
                    format!("expected text, got {}", yaml_type(other)),
                ));
            }
        };

        let category = match fields.get("category").copied() {
            None => {
                return Err(BuildError::validation(
                    "category",
                    format!(
                        "missing required field; expected one of {}",
                        Category::options_list()
                    ),
                ));
            }
            Some(YamlValue::String(slug)) => Category::parse(slug)?,
            Some(other) => {
                return Err(BuildError::validation(
                    "category",
                    format!(
                        "expected text, got {}; valid categories are {}",
                        yaml_type(other),
                        Category::options_list()
                    ),
                ));
            }
        };

        let story = match fields.get("story").copied() {
            None => None,
            Some(YamlValue::String(story)) => Some(story.clone()),
            Some(other) => {
                return Err(BuildError::validation(
                    "story",
                    format!(
                        "expected text when present, got {}; omit the field for recipes without a story",
                        yaml_type(other)
                    ),
                ));
            }
        };

        Ok(Self {
            title,
            category,
            story,
        })
    }
}

/// A recipe document: validated front matter plus the markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDocument {
    /// URL slug, derived from the file name.
    pub slug: String,
    /// Validated front matter.
    pub front_matter: RecipeFrontMatter,
    /// The markdown body following the front-matter block.
    pub body: String,
    /// Source file the document was loaded from.
    pub source: PathBuf,
}

/// The recipes front-matter schema, registered in a [`CollectionRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeSchema;

impl RecipeSchema {
    /// Validates a raw front-matter record.
    pub fn validate(&self, front_matter: Option<&str>) -> Result<RecipeFrontMatter> {
        RecipeFrontMatter::from_yaml(front_matter.unwrap_or_default())
    }

    /// Parses and validates a whole document, attaching the source path to
    /// any validation error.
    pub fn parse_document(&self, source: &Path, raw: &str) -> Result<RecipeDocument> {
        let slug = source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                BuildError::internal(format!("document has no usable file stem: {source:?}"))
            })?;

        let (front_matter, body) =
            split_front_matter(raw).map_err(|e| e.with_document(source.to_path_buf()))?;
        let front_matter = self
            .validate(front_matter.as_deref())
            .map_err(|e| e.with_document(source.to_path_buf()))?;

        Ok(RecipeDocument {
            slug,
            front_matter,
            body,
            source: source.to_path_buf(),
        })
    }
}

/// An explicit mapping from collection name to schema, passed into the build
/// step rather than held in process-wide state.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: BTreeMap<String, RecipeSchema>,
}

impl CollectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry for the cookbook: a single `recipes` collection.
    pub fn cookbook() -> Self {
        let mut registry = Self::new();
        registry.register(RECIPES, RecipeSchema);
        registry
    }

    /// Registers a collection schema under a name.
    pub fn register<S: Into<String>>(&mut self, name: S, schema: RecipeSchema) {
        _ = self.collections.insert(name.into(), schema);
    }

    /// Registered collection names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Loads and validates every document of a collection.
    ///
    /// Documents live one file per recipe under `<content_dir>/<name>/`.
    /// Loading is fail-fast: the first invalid document aborts with its file
    /// and field; no partially validated collection is ever returned.
    pub fn load(&self, name: &str, content_dir: &Path) -> Result<Vec<RecipeDocument>> {
        let schema = self
            .collections
            .get(name)
            .ok_or_else(|| BuildError::config(format!("unknown collection `{name}`"), None))?;

        let dir = content_dir.join(name);
        if !dir.is_dir() {
            return Err(BuildError::config(
                format!("collection directory does not exist: {}", dir.display()),
                Some(dir),
            ));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| BuildError::io(dir.clone(), e))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| BuildError::io(dir.clone(), e))?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
            })
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            debug!("validating {}", path.display());
            let raw = fs::read_to_string(&path).map_err(|e| BuildError::io(path.clone(), e))?;
            documents.push(schema.parse_document(&path, &raw)?);
        }

        info!(
            "loaded {} documents from collection `{name}`",
            documents.len()
        );
        Ok(documents)
    }
}

/// Splits a document into its front-matter block and body.
///
/// Front matter is delimited by a `---` line at the very start of the file
/// and a matching `---` line; a document without an opening fence has no
/// front matter. An opening fence without a closing one is an error.
pub fn split_front_matter(content: &str) -> Result<(Option<String>, String)> {
    let mut segments = content.split_inclusive('\n');
    let Some(first) = segments.next() else {
        return Ok((None, String::new()));
    };
    if first.trim_end() != "---" {
        return Ok((None, content.to_string()));
    }

    let mut yaml = String::new();
    let mut offset = first.len();
    for segment in segments {
        offset += segment.len();
        if segment.trim_end() == "---" {
            return Ok((Some(yaml), content[offset..].to_string()));
        }
        yaml.push_str(segment);
    }

    Err(BuildError::validation(
        "front matter",
        "unterminated front-matter block (missing closing `---`)",
    ))
}

fn yaml_type(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "text",
        YamlValue::Sequence(_) => "a list",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = "---\ntitle: Lemon Meringue Pie\ncategory: cakes-pies-frostings\nstory: Grandma's favourite.\n---\n\nBeat the egg whites until stiff.\n";

    #[test]
    fn test_category_slugs_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.slug()).unwrap(), category);
        }
    }

    #[test]
    fn test_category_serde_uses_slugs() {
        let json = serde_json::to_string(&Category::YeastBreadsRollsSweetDough).unwrap();
        assert_eq!(json, "\"yeast-breads-rolls-sweet-dough\"");
        let parsed: Category = serde_json::from_str("\"salads\"").unwrap();
        assert_eq!(parsed, Category::Salads);
    }

    #[test]
    fn test_unknown_category_lists_all_options() {
        let err = Category::parse("desserts").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`desserts`"));
        for category in Category::ALL {
            assert!(
                message.contains(category.slug()),
                "missing {} in: {message}",
                category.slug()
            );
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            Category::QuickbreadsMuffinsPancakes.display_name(),
            "Quickbreads, Muffins, Pancakes"
        );
        assert_eq!(Category::Salads.display_name(), "Salads");
    }

    #[test]
    fn test_split_front_matter() {
        let (yaml, body) = split_front_matter(VALID).unwrap();
        assert_eq!(
            yaml.unwrap(),
            "title: Lemon Meringue Pie\ncategory: cakes-pies-frostings\nstory: Grandma's favourite.\n"
        );
        assert_eq!(body, "\nBeat the egg whites until stiff.\n");
    }

    #[test]
    fn test_split_without_front_matter() {
        let (yaml, body) = split_front_matter("Just a body.\n").unwrap();
        assert!(yaml.is_none());
        assert_eq!(body, "Just a body.\n");
    }

    #[test]
    fn test_split_unterminated_front_matter() {
        assert!(split_front_matter("---\ntitle: Pie\n").is_err());
    }

    #[test]
    fn test_valid_front_matter() {
        let fm = RecipeFrontMatter::from_yaml(
            "title: Potato Salad\ncategory: salads\nstory: From the lake house.\n",
        )
        .unwrap();
        assert_eq!(fm.title, "Potato Salad");
        assert_eq!(fm.category, Category::Salads);
        assert_eq!(fm.story.as_deref(), Some("From the lake house."));
    }

    #[test]
    fn test_absent_story_resolves_to_none() {
        let fm = RecipeFrontMatter::from_yaml("title: Potato Salad\ncategory: salads\n").unwrap();
        assert_eq!(fm.story, None);
    }

    #[test]
    fn test_missing_title_names_the_field() {
        let err = RecipeFrontMatter::from_yaml("category: salads\n").unwrap_err();
        match err {
            BuildError::Validation { field, .. } => assert_eq!(field, "title"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(RecipeFrontMatter::from_yaml("title: \"\"\ncategory: salads\n").is_err());
    }

    #[test]
    fn test_non_text_title_rejected() {
        let err = RecipeFrontMatter::from_yaml("title: 42\ncategory: salads\n").unwrap_err();
        assert!(err.to_string().contains("expected text, got a number"));
    }

    #[test]
    fn test_missing_category_lists_options() {
        let err = RecipeFrontMatter::from_yaml("title: Pie\n").unwrap_err();
        assert!(err.to_string().contains("cakes-pies-frostings"));
        assert!(err.to_string().contains("yeast-breads-rolls-sweet-dough"));
    }

    #[test]
    fn test_invalid_category_fails() {
        let err = RecipeFrontMatter::from_yaml("title: Pie\ncategory: desserts\n").unwrap_err();
        match &err {
            BuildError::Validation { field, .. } => assert_eq!(field, "category"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn test_null_story_rejected() {
        let err =
            RecipeFrontMatter::from_yaml("title: Pie\ncategory: salads\nstory: null\n").unwrap_err();
        assert!(err.to_string().contains("got null"));
    }

    #[test]
    fn test_non_text_story_rejected() {
        assert!(
            RecipeFrontMatter::from_yaml("title: Pie\ncategory: salads\nstory: [a, b]\n").is_err()
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err =
            RecipeFrontMatter::from_yaml("title: Pie\ncategory: salads\nservings: 8\n").unwrap_err();
        match err {
            BuildError::Validation { field, .. } => assert_eq!(field, "servings"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_document_keeps_body_and_slug() {
        let doc = RecipeSchema
            .parse_document(Path::new("src/content/recipes/lemon-pie.md"), VALID)
            .unwrap();
        assert_eq!(doc.slug, "lemon-pie");
        assert!(doc.body.contains("Beat the egg whites"));
        assert_eq!(doc.front_matter.category, Category::CakesPiesFrostings);
    }

    #[test]
    fn test_parse_document_attaches_source_path() {
        let err = RecipeSchema
            .parse_document(
                Path::new("src/content/recipes/bad.md"),
                "---\ntitle: Bad\ncategory: desserts\n---\n",
            )
            .unwrap_err();
        match err {
            BuildError::Validation { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("src/content/recipes/bad.md")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn write_recipe(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_registry_loads_collection_in_path_order() {
        let temp_dir = TempDir::new().unwrap();
        let recipes = temp_dir.path().join(RECIPES);
        fs::create_dir_all(&recipes).unwrap();
        write_recipe(
            &recipes,
            "zucchini-bread.md",
            "---\ntitle: Zucchini Bread\ncategory: quickbreads-muffins-pancakes\n---\nbody\n",
        );
        write_recipe(
            &recipes,
            "ambrosia.md",
            "---\ntitle: Ambrosia\ncategory: salads\n---\nbody\n",
        );
        write_recipe(&recipes, "notes.txt", "not a document");

        let registry = CollectionRegistry::cookbook();
        let docs = registry.load(RECIPES, temp_dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].slug, "ambrosia");
        assert_eq!(docs[1].slug, "zucchini-bread");
    }

    #[test]
    fn test_registry_load_fails_fast_on_invalid_document() {
        let temp_dir = TempDir::new().unwrap();
        let recipes = temp_dir.path().join(RECIPES);
        fs::create_dir_all(&recipes).unwrap();
        write_recipe(
            &recipes,
            "good.md",
            "---\ntitle: Good\ncategory: salads\n---\nbody\n",
        );
        write_recipe(&recipes, "invalid.md", "---\ntitle: Broken\n---\nbody\n");

        let registry = CollectionRegistry::cookbook();
        let err = registry.load(RECIPES, temp_dir.path()).unwrap_err();
        match err {
            BuildError::Validation { field, path, .. } => {
                assert_eq!(field, "category");
                assert_eq!(path, Some(recipes.join("invalid.md")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_registry_rejects_unknown_collection() {
        let temp_dir = TempDir::new().unwrap();
        let registry = CollectionRegistry::cookbook();
        assert!(registry.load("essays", temp_dir.path()).is_err());
    }

    #[test]
    fn test_registry_rejects_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let registry = CollectionRegistry::cookbook();
        assert!(registry.load(RECIPES, temp_dir.path()).is_err());
    }
}
