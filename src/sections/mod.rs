//! Section components: one renderer per content block type.
//!
//! Every component is a pair of a data struct (deserialized from the block's
//! JSON at the content boundary, see [`crate::content::Block`]) and a pure
//! `render` function built on the [`primitives`].
//!
//! | Module | Block component names |
//! |--------|-----------------------|
//! | [`hero`] | `hero` (legacy `hero_section`) |
//! | [`pricing`] | `pricing` (legacy `pricing_table`) |
//! | [`gallery`] | `gallery` (legacy `image_gallery`) |
//! | [`faq`] | `faq` (legacy `faq_section`) |
//! | [`footer`] | `footer` (legacy `site_footer`) |
//! | [`map`] | `map` |
//! | [`experience`] | `experience` |
//! | [`alternating`] | `alternating_blocks` |
//! | [`brand_proof`] | `brand_proof` |
//! | [`spaces`] | `spaces` |

pub mod alternating;
pub mod brand_proof;
pub mod experience;
pub mod faq;
pub mod footer;
pub mod gallery;
pub mod hero;
pub mod map;
pub mod pricing;
pub mod primitives;
pub mod spaces;

use crate::content::{ContentBlock, Link};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, html as md_html};

/// Per-block rendering context handed to every section renderer.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub uid: &'a str,
    pub component: &'a str,
    /// Storyblok `_editable` comment, present on draft content.
    pub editable: Option<&'a str>,
    /// Rendering through the editor registry: emit visual-editor attributes.
    pub editor: bool,
}

impl<'a> BlockContext<'a> {
    pub fn new(block: &'a ContentBlock, editor: bool) -> Self {
        Self {
            uid: &block.uid,
            component: &block.component,
            editable: block.editable.as_deref(),
            editor,
        }
    }

    /// `data-blok-c` / `data-blok-uid` values, only in editor mode.
    pub fn editable_attributes(&self) -> Option<EditableAttributes> {
        if !self.editor {
            return None;
        }
        self.editable.and_then(parse_editable)
    }
}

/// Attributes the Storyblok visual editor uses to outline a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableAttributes {
    /// The JSON payload of the `_editable` comment.
    pub payload: String,
    /// `{story id}-{block uid}`.
    pub uid: String,
}

/// Parse `<!--#storyblok#{"name": "hero", "id": "42", "uid": "abc"}-->`.
pub fn parse_editable(comment: &str) -> Option<EditableAttributes> {
    let payload = comment
        .trim()
        .strip_prefix("<!--#storyblok#")?
        .strip_suffix("-->")?;
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    let id = match &value["id"] {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let uid = value["uid"].as_str()?;
    Some(EditableAttributes {
        payload: payload.to_string(),
        uid: format!("{id}-{uid}"),
    })
}

/// Render CMS markdown to HTML. Raw HTML in the source is escaped.
pub fn markdown(source: &str) -> Markup {
    let parser = Parser::new(source).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

/// Markdown for a single line: the wrapping `<p>` is dropped.
pub fn markdown_inline(source: &str) -> Markup {
    let rendered = markdown(source).into_string();
    let trimmed = rendered.trim();
    let inner = trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .unwrap_or(trimmed);
    PreEscaped(inner.to_string())
}

/// Call-to-action link. Renders nothing without a label or target.
pub fn cta(label: &str, link: &Link, class: &str) -> Markup {
    html! {
        @if !label.trim().is_empty() && !link.is_empty() {
            @if link.is_external() {
                a class=(class) href=(link.href) target="_blank" rel="noopener" { (label) }
            } @else {
                a class=(class) href=(link.href) { (label) }
            }
        }
    }
}

/// Split a multi-line text field into trimmed, non-empty lines.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_editable_comment() {
        let attrs = parse_editable(
            r#"<!--#storyblok#{"name": "hero", "space": "9", "uid": "abc-1", "id": "42"}-->"#,
        )
        .unwrap();
        assert_eq!(attrs.uid, "42-abc-1");
        assert!(attrs.payload.starts_with('{'));
    }

    #[test]
    fn parse_editable_numeric_id() {
        let attrs = parse_editable(r#"<!--#storyblok#{"uid": "u", "id": 7}-->"#).unwrap();
        assert_eq!(attrs.uid, "7-u");
    }

    #[test]
    fn parse_editable_rejects_garbage() {
        assert!(parse_editable("not a comment").is_none());
        assert!(parse_editable("<!--#storyblok#{broken-->").is_none());
    }

    #[test]
    fn markdown_escapes_raw_html() {
        let html = markdown("Hello <script>alert(1)</script> **there**").into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("<strong>there</strong>"));
    }

    #[test]
    fn markdown_inline_drops_paragraph() {
        assert_eq!(markdown_inline("*a*").into_string(), "<em>a</em>");
    }

    #[test]
    fn cta_requires_label_and_link() {
        assert!(cta("", &Link::new("/x"), "btn").into_string().is_empty());
        assert!(cta("Go", &Link::default(), "btn").into_string().is_empty());
        let html = cta("Tour", &Link::new("https://cal.example"), "btn").into_string();
        assert!(html.contains(r#"rel="noopener""#));
    }

    #[test]
    fn lines_skips_blank() {
        let collected: Vec<_> = lines("a\n\n  b  \n").collect();
        assert_eq!(collected, vec!["a", "b"]);
    }
}
