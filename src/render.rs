//! Page documents.
//!
//! Turns a decoded [`Story`] into a full HTML document, and renders the three
//! status pages the router needs: not found, upstream failure and the render
//! error boundary.
//!
//! ## Document shell
//!
//! Every page shares [`base_document`]: meta tags, the stylesheet link, the
//! theme script (inlined in `<head>` so the theme is applied before first
//! paint), the preference toggles and, on preview requests only, the
//! visual-editor bootstrap.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (color and brand tokens prepended from config)
//! - `static/theme.js`: theme resolution and toggles
//! - `static/bridge.js`: visual-editor glue
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::bridge::{LEGACY_SCRIPT, MAX_POLLS, POLL_INTERVAL, PRIMARY_SCRIPT};
use crate::config::{self, SiteConfig};
use crate::content::Story;
use crate::registry::{RenderContext, RenderError};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use sha2::{Digest, Sha256};
use std::error::Error;

const CSS_STATIC: &str = include_str!("../static/style.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const BRIDGE_JS: &str = include_str!("../static/bridge.js");

pub const STYLESHEET_PATH: &str = "/assets/style.css";
pub const PREVIEW_EVENT_PATH: &str = "/api/preview/event";

/// The site stylesheet: generated tokens followed by the base styles.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub css: String,
    /// Quoted strong ETag, a SHA-256 prefix of the CSS.
    pub etag: String,
}

impl Stylesheet {
    pub fn new(config: &SiteConfig) -> Self {
        let css = format!(
            "{}\n\n{}\n\n{}",
            config::generate_color_css(&config.colors),
            config::generate_brand_css(&config.brands),
            CSS_STATIC
        );
        let digest = format!("{:x}", Sha256::digest(css.as_bytes()));
        let etag = format!("\"{}\"", &digest[..16]);
        Self { css, etag }
    }

    /// Stylesheet URL with a version query, so a changed config busts caches.
    pub fn href(&self) -> String {
        format!("{STYLESHEET_PATH}?v={}", self.etag.trim_matches('"'))
    }
}

/// Per-request document settings.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub site_name: &'a str,
    pub stylesheet_href: &'a str,
    /// Emit the visual-editor bootstrap.
    pub preview: bool,
}

/// Render a story page through the registry selected for this request.
pub fn render_story(
    story: &Story,
    ctx: &RenderContext<'_>,
    doc: &Document<'_>,
) -> Result<Markup, RenderError> {
    let registry = ctx.kind.registry();
    let body = registry.render_blocks(&story.blocks, ctx)?;
    let title = page_title(story, doc.site_name);
    Ok(base_document(
        doc,
        &title,
        Some(&story.meta.meta_description),
        html! {
            main id="content" data-story-id=(story.id) data-registry=(ctx.kind.as_str()) {
                (body)
            }
        },
    ))
}

fn page_title(story: &Story, site_name: &str) -> String {
    if !story.meta.meta_title.trim().is_empty() {
        story.meta.meta_title.clone()
    } else if story.name.trim().is_empty() {
        site_name.to_string()
    } else {
        format!("{} | {}", story.name, site_name)
    }
}

/// 404 page for slugs the CMS does not know.
pub fn render_not_found(doc: &Document<'_>, path: &str) -> Markup {
    status_page(
        doc,
        "Page not found",
        html! {
            h1 { "Page not found" }
            p { "There is nothing at " code { (path) } "." }
            p { a.button.button--primary href="/" { "Back to the home page" } }
        },
    )
}

/// 502 page when the content API fails.
pub fn render_upstream_error(doc: &Document<'_>) -> Markup {
    status_page(
        doc,
        "Temporarily unavailable",
        html! {
            h1 { "We'll be right back" }
            p { "This page could not be loaded just now. Please try again in a moment." }
            (retry_button())
        },
    )
}

/// Error boundary: shown when a page fails to render. The error chain is
/// only included outside production.
pub fn render_error_boundary(doc: &Document<'_>, err: &dyn Error, show_details: bool) -> Markup {
    status_page(
        doc,
        "Something went wrong",
        html! {
            h1 { "Something went wrong" }
            p { "This part of the site failed to load." }
            (retry_button())
            @if show_details {
                pre.status-page__details { (error_chain(err).join("\ncaused by: ")) }
            }
        },
    )
}

/// An error and its sources, outermost first.
pub fn error_chain(err: &dyn Error) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

/// Re-requests the current page without needing script.
fn retry_button() -> Markup {
    html! {
        form method="get" {
            button.button.button--primary type="submit" { "Try again" }
        }
    }
}

fn status_page(doc: &Document<'_>, title: &str, content: Markup) -> Markup {
    let title = format!("{title} | {}", doc.site_name);
    base_document(
        doc,
        &title,
        None,
        html! {
            main.status-page id="content" { (content) }
        },
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(doc: &Document<'_>, title: &str, description: Option<&str>, content: Markup) -> Markup {
    let description = description.filter(|d| !d.trim().is_empty());
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                @if doc.preview {
                    meta name="robots" content="noindex";
                }
                link rel="stylesheet" href=(doc.stylesheet_href);
                script { (PreEscaped(THEME_JS)) }
            }
            body {
                (content)
                (preference_toggles())
                @if doc.preview {
                    (bridge_bootstrap())
                }
            }
        }
    }
}

fn preference_toggles() -> Markup {
    html! {
        div.preferences aria-label="Display preferences" {
            button type="button" data-toggle="theme" { "Light / dark" }
            button type="button" data-toggle="brand" { "Classic / garden" }
        }
    }
}

fn bridge_bootstrap() -> Markup {
    html! {
        script
            data-primary=(PRIMARY_SCRIPT)
            data-legacy=(LEGACY_SCRIPT)
            data-endpoint=(PREVIEW_EVENT_PATH)
            data-poll-ms=(POLL_INTERVAL.as_millis().to_string())
            data-max-polls=(MAX_POLLS)
        {
            (PreEscaped(BRIDGE_JS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryKind;
    use crate::test_helpers::home_story;

    fn doc(preview: bool) -> Document<'static> {
        Document {
            site_name: "Rose Ridge",
            stylesheet_href: "/assets/style.css?v=1",
            preview,
        }
    }

    fn ctx(kind: RegistryKind) -> RenderContext<'static> {
        RenderContext {
            kind,
            site_name: "Rose Ridge",
        }
    }

    // =========================================================================
    // Story pages
    // =========================================================================

    #[test]
    fn story_page_has_title_description_and_sections() {
        let story = home_story();
        let html = render_story(&story, &ctx(RegistryKind::Clean), &doc(false))
            .unwrap()
            .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Rose Ridge | Hillside weddings</title>"));
        assert!(html.contains(r#"<meta name="description""#));
        assert!(html.contains(r#"data-section-uid="hero-1""#));
        assert!(html.contains(r#"href="/assets/style.css?v=1""#));
    }

    #[test]
    fn bridge_bootstrap_only_on_preview() {
        let story = home_story();
        let published = render_story(&story, &ctx(RegistryKind::Clean), &doc(false))
            .unwrap()
            .into_string();
        assert!(!published.contains("data-endpoint"));

        let preview = render_story(&story, &ctx(RegistryKind::Clean), &doc(true))
            .unwrap()
            .into_string();
        assert!(preview.contains(r#"data-endpoint="/api/preview/event""#));
        assert!(preview.contains(PRIMARY_SCRIPT));
        assert!(preview.contains(r#"data-poll-ms="100""#));
        assert!(preview.contains(r#"data-max-polls="50""#));
        assert!(preview.contains(r#"content="noindex""#));
    }

    #[test]
    fn html_tag_carries_no_theme_attributes() {
        let html = render_not_found(&doc(false), "/x").into_string();
        assert!(html.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn title_falls_back_to_story_name() {
        let mut story = home_story();
        story.meta.meta_title.clear();
        assert_eq!(page_title(&story, "Rose Ridge"), "Home | Rose Ridge");
        story.name.clear();
        assert_eq!(page_title(&story, "Rose Ridge"), "Rose Ridge");
    }

    // =========================================================================
    // Status pages
    // =========================================================================

    #[test]
    fn error_boundary_hides_details_in_production() {
        let err = RenderError::UnknownBlock {
            component: "countdown".into(),
            uid: "u1".into(),
        };
        let hidden = render_error_boundary(&doc(false), &err, false).into_string();
        assert!(hidden.contains("Something went wrong"));
        assert!(hidden.contains("Try again"));
        assert!(!hidden.contains("countdown"));

        let shown = render_error_boundary(&doc(false), &err, true).into_string();
        assert!(shown.contains("no renderer for component `countdown`"));
    }

    #[test]
    fn not_found_escapes_path() {
        let html = render_not_found(&doc(false), "/<script>").into_string();
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn error_chain_follows_sources() {
        let inner = std::io::Error::other("disk on fire");
        let outer = crate::config::ConfigError::Io(inner);
        assert_eq!(error_chain(&outer), vec!["IO error: disk on fire", "disk on fire"]);
    }

    // =========================================================================
    // Stylesheet
    // =========================================================================

    #[test]
    fn stylesheet_includes_tokens_and_etag() {
        let sheet = Stylesheet::new(&SiteConfig::default());
        assert!(sheet.css.contains("--color-bg: #fbf8f4"));
        assert!(sheet.css.contains("[data-brand=\"garden\"]"));
        assert!(sheet.css.contains(".section--bg-tint-sage"));
        assert_eq!(sheet.etag.len(), 18);
        assert!(sheet.href().starts_with("/assets/style.css?v="));
    }

    #[test]
    fn etag_changes_with_config() {
        let a = Stylesheet::new(&SiteConfig::default());
        let mut config = SiteConfig::default();
        config.colors.light.background = "#ffffff".into();
        let b = Stylesheet::new(&config);
        assert_ne!(a.etag, b.etag);
    }
}
