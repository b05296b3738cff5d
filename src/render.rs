//! # Page Rendering Module
//!
//! Renders recipe documents into complete HTML pages. Recipe bodies are
//! markdown, processed with `pulldown-cmark`; the surrounding page shell is
//! a fixed structure whose utility classes come from the active theme.
//! Every internal link goes through the site configuration's base path, so
//! generated URLs work under subpath deployment.

use pulldown_cmark::{html, Options as MarkdownOptions, Parser};

use crate::content::{Category, RecipeDocument};
use crate::core::config::SiteConfig;
use crate::core::error::Result;
use crate::PageRenderer;

/// Site-relative path of the generated stylesheet.
pub const STYLESHEET_PATH: &str = "styles/cookbook.css";

/// Title shown in the page header and the document titles.
pub const SITE_TITLE: &str = "Lemons Family Cookbook";

/// Renderer for the cookbook's recipe, category, and home pages.
#[derive(Debug, Clone, Copy)]
pub struct CookbookPageRenderer {
    options: MarkdownOptions,
}

impl CookbookPageRenderer {
    /// Creates a renderer with tables, footnotes, and strikethrough enabled.
    pub fn new() -> Self {
        let mut options = MarkdownOptions::empty();
        options.insert(MarkdownOptions::ENABLE_TABLES);
        options.insert(MarkdownOptions::ENABLE_FOOTNOTES);
        options.insert(MarkdownOptions::ENABLE_STRIKETHROUGH);
        Self { options }
    }

    /// Renders a markdown body to HTML.
    fn render_markdown(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Wraps page content in the shared document shell.
    fn page_shell(&self, site: &SiteConfig, title: &str, main: &str) -> String {
        let stylesheet = site.href(STYLESHEET_PATH);
        let home = site.href("");
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title} - {SITE_TITLE}</title>\n\
             <link rel=\"stylesheet\" href=\"{stylesheet}\">\n\
             </head>\n\
             <body class=\"bg-cream text-ink font-body text-fluid-base\">\n\
             <header class=\"p-card border-rule\">\n\
             <a class=\"font-display text-display-sm text-sienna\" href=\"{home}\">{SITE_TITLE}</a>\n\
             </header>\n\
             <main class=\"max-w-prose p-card m-card\">\n\
             {main}\
             </main>\n\
             </body>\n\
             </html>\n",
            title = escape_html(title),
        )
    }
}

impl Default for CookbookPageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer for CookbookPageRenderer {
    fn render_recipe(&self, document: &RecipeDocument, site: &SiteConfig) -> Result<String> {
        let category = document.front_matter.category;
        let category_href = site.href(&format!("{}/", category.slug()));

        let mut main = String::new();
        main.push_str(&format!(
            "<h1 class=\"font-display text-display-md\">{}</h1>\n",
            escape_html(&document.front_matter.title)
        ));
        main.push_str(&format!(
            "<p class=\"text-fluid-sm text-ink-muted\"><a class=\"text-sage-dark\" href=\"{category_href}\">{}</a></p>\n",
            escape_html(category.display_name())
        ));
        if let Some(story) = &document.front_matter.story {
            main.push_str(&format!(
                "<blockquote class=\"text-fluid-lg text-ink-light shadow-card rounded-card p-card\">{}</blockquote>\n",
                escape_html(story)
            ));
        }
        main.push_str(&self.render_markdown(&document.body));

        Ok(self.page_shell(site, &document.front_matter.title, &main))
    }

    fn render_category(
        &self,
        category: Category,
        documents: &[&RecipeDocument],
        site: &SiteConfig,
    ) -> Result<String> {
        let mut main = String::new();
        main.push_str(&format!(
            "<h1 class=\"font-display text-display-md\">{}</h1>\n",
            escape_html(category.display_name())
        ));
        main.push_str("<ul class=\"gap-card\">\n");
        for document in documents {
            let href = site.href(&format!("recipes/{}/", document.slug));
            main.push_str(&format!(
                "<li><a class=\"text-sienna-dark\" href=\"{href}\">{}</a></li>\n",
                escape_html(&document.front_matter.title)
            ));
        }
        main.push_str("</ul>\n");

        Ok(self.page_shell(site, category.display_name(), &main))
    }

    fn render_home(&self, documents: &[RecipeDocument], site: &SiteConfig) -> Result<String> {
        let mut main = String::new();
        main.push_str(&format!(
            "<h1 class=\"font-display text-display-lg\">{SITE_TITLE}</h1>\n"
        ));
        main.push_str("<ul class=\"gap-card\">\n");
        for category in Category::ALL {
            let count = documents
                .iter()
                .filter(|document| document.front_matter.category == category)
                .count();
            let href = site.href(&format!("{}/", category.slug()));
            main.push_str(&format!(
                "<li><a class=\"text-sienna-dark\" href=\"{href}\">{}</a> <span class=\"text-fluid-sm text-ink-muted\">({count})</span></li>\n",
                escape_html(category.display_name())
            ));
        }
        main.push_str("</ul>\n");

        Ok(self.page_shell(site, "Recipes", &main))
    }
}

/// Escapes the five HTML-significant characters in text content.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
