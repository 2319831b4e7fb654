//! Layout primitives shared by every section component.
//!
//! Each primitive turns a small closed set of style options into CSS classes
//! and `data-*` attributes. There is no business logic here: every option
//! value maps to exactly one class suffix, and the same inputs always produce
//! the same markup.
//!
//! | Primitive | Output |
//! |-----------|--------|
//! | [`section`] | `<section class="section section--bg-… section--align-… section--pad-…">` |
//! | [`section_wrapper`] | inner width container `div.wrapper.wrapper--…` |
//! | [`section_header`] | script accent, title, lead |
//! | [`section_shell`] | section + wrapper + header around a body |
//! | [`card`] | `div.card.card--…` |
//! | [`media`] | `figure.media.media--…` with a lazy `<img>` |
//!
//! Option strings come from the CMS and are parsed leniently: unknown or
//! empty values fall back to the default variant, so an editor typo changes
//! the look of one section instead of failing the page.

use super::{BlockContext, markdown_inline};
use crate::content::Asset;
use maud::{Markup, html};
use serde::Deserialize;

// ============================================================================
// Style options
// ============================================================================

/// Horizontal alignment of the section header and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub const ALL: [Align; 3] = [Align::Left, Align::Center, Align::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

impl From<Option<String>> for Align {
    fn from(value: Option<String>) -> Self {
        match normalize_option(value).as_str() {
            "left" | "start" => Align::Left,
            "right" | "end" => Align::Right,
            _ => Align::Center,
        }
    }
}

/// Maximum content width inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Width {
    Prose,
    #[default]
    Content,
    Wide,
    Full,
}

impl Width {
    pub const ALL: [Width; 4] = [Width::Prose, Width::Content, Width::Wide, Width::Full];

    pub fn as_str(self) -> &'static str {
        match self {
            Width::Prose => "prose",
            Width::Content => "content",
            Width::Wide => "wide",
            Width::Full => "full",
        }
    }
}

impl From<Option<String>> for Width {
    fn from(value: Option<String>) -> Self {
        match normalize_option(value).as_str() {
            "prose" | "narrow" => Width::Prose,
            "wide" => Width::Wide,
            "full" | "full-bleed" => Width::Full,
            _ => Width::Content,
        }
    }
}

/// Vertical padding scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Padding {
    Xs,
    Sm,
    Md,
    #[default]
    Lg,
    Xl,
    /// `clamp()`-based padding that scales with the viewport.
    Fluid,
}

impl Padding {
    pub const ALL: [Padding; 6] = [
        Padding::Xs,
        Padding::Sm,
        Padding::Md,
        Padding::Lg,
        Padding::Xl,
        Padding::Fluid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Padding::Xs => "xs",
            Padding::Sm => "sm",
            Padding::Md => "md",
            Padding::Lg => "lg",
            Padding::Xl => "xl",
            Padding::Fluid => "fluid",
        }
    }
}

impl From<Option<String>> for Padding {
    fn from(value: Option<String>) -> Self {
        match normalize_option(value).as_str() {
            "xs" => Padding::Xs,
            "sm" => Padding::Sm,
            "md" => Padding::Md,
            "xl" => Padding::Xl,
            "fluid" => Padding::Fluid,
            _ => Padding::Lg,
        }
    }
}

/// Section background. Exactly one per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Background {
    #[default]
    Surface,
    TintBlush,
    TintSage,
    TintSand,
    DarkGradient,
    /// Uses the section's `background_image` asset.
    Image,
}

impl Background {
    pub const ALL: [Background; 6] = [
        Background::Surface,
        Background::TintBlush,
        Background::TintSage,
        Background::TintSand,
        Background::DarkGradient,
        Background::Image,
    ];

    /// Value of `data-bg` and the class suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Background::Surface => "surface",
            Background::TintBlush => "tint-blush",
            Background::TintSage => "tint-sage",
            Background::TintSand => "tint-sand",
            Background::DarkGradient => "dark-gradient",
            Background::Image => "image",
        }
    }

    /// Parse a CMS value; `None` when it is not one of the known variants.
    pub fn parse(value: &str) -> Option<Background> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "surface" | "" => Some(Background::Surface),
            "tint-blush" | "blush" => Some(Background::TintBlush),
            "tint-sage" | "sage" => Some(Background::TintSage),
            "tint-sand" | "sand" => Some(Background::TintSand),
            "dark-gradient" | "dark" => Some(Background::DarkGradient),
            "image" => Some(Background::Image),
            _ => None,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Background::DarkGradient | Background::Image)
    }
}

impl From<Option<String>> for Background {
    fn from(value: Option<String>) -> Self {
        value
            .as_deref()
            .and_then(Background::parse)
            .unwrap_or_default()
    }
}

fn normalize_option(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_ascii_lowercase().replace('_', "-"))
        .unwrap_or_default()
}

// ============================================================================
// Section fields (shared by every section block)
// ============================================================================

/// Header slot and style options every section block carries.
///
/// Flattened into each block struct, so the CMS schema keeps these as plain
/// top-level fields of the block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionFields {
    pub script_accent: String,
    pub title: String,
    /// Inline markdown.
    pub lead: String,
    pub alignment: Align,
    pub width: Width,
    pub padding: Padding,
    pub background_variant: Background,
    pub background_image: Asset,
}

impl SectionFields {
    pub fn options(&self) -> SectionOptions {
        SectionOptions {
            align: self.alignment,
            width: self.width,
            padding: self.padding,
            background: self.background_variant,
            background_image: (!self.background_image.is_empty())
                .then(|| self.background_image.url.clone()),
        }
    }

    pub fn header(&self) -> SectionHeader<'_> {
        SectionHeader {
            script_accent: &self.script_accent,
            title: &self.title,
            lead: &self.lead,
        }
    }
}

/// Resolved style options for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOptions {
    pub align: Align,
    pub width: Width,
    pub padding: Padding,
    pub background: Background,
    pub background_image: Option<String>,
}

impl SectionOptions {
    /// Class list for the `<section>` element, `kind` being the block's own
    /// class (`hero`, `pricing`, ...).
    pub fn classes(&self, kind: &str) -> Vec<String> {
        let mut classes = vec![
            "section".to_string(),
            format!("section--{kind}"),
            format!("section--bg-{}", self.effective_background().as_str()),
            format!("section--align-{}", self.align.as_str()),
            format!("section--pad-{}", self.padding.as_str()),
        ];
        if self.effective_background().is_dark() {
            classes.push("section--on-dark".to_string());
        }
        classes
    }

    /// `Image` without an image falls back to `Surface`.
    pub fn effective_background(&self) -> Background {
        match (self.background, &self.background_image) {
            (Background::Image, None) => Background::Surface,
            (bg, _) => bg,
        }
    }

    fn style(&self) -> Option<String> {
        match (self.effective_background(), &self.background_image) {
            (Background::Image, Some(url)) => {
                Some(format!("--section-bg-image: url(\"{}\");", css_escape_url(url)))
            }
            _ => None,
        }
    }
}

/// Escape characters that would end a quoted CSS `url("...")`.
fn css_escape_url(url: &str) -> String {
    url.replace('\\', "%5C")
        .replace('"', "%22")
        .replace('\n', "")
        .replace('\r', "")
}

/// The optional header rendered above every section body.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionHeader<'a> {
    pub script_accent: &'a str,
    pub title: &'a str,
    pub lead: &'a str,
}

impl SectionHeader<'_> {
    pub fn is_empty(&self) -> bool {
        self.script_accent.trim().is_empty()
            && self.title.trim().is_empty()
            && self.lead.trim().is_empty()
    }
}

// ============================================================================
// Primitives
// ============================================================================

/// The outer `<section>` element with its class list and data attributes.
///
/// `data-section-uid` is the stable target the visual-editor bridge patches;
/// in editor mode the Storyblok `data-blok-*` attributes are added too.
pub fn section(ctx: &BlockContext, kind: &str, options: &SectionOptions, content: Markup) -> Markup {
    let classes = options.classes(kind).join(" ");
    let editable = ctx.editable_attributes();
    html! {
        section
            class=(classes)
            style=[options.style()]
            data-section-uid=(ctx.uid)
            data-component=(ctx.component)
            data-bg=(options.effective_background().as_str())
            data-align=(options.align.as_str())
            data-width=(options.width.as_str())
            data-blok-c=[editable.as_ref().map(|e| e.payload.as_str())]
            data-blok-uid=[editable.as_ref().map(|e| e.uid.as_str())]
        {
            (content)
        }
    }
}

/// Inner container limiting the content width.
pub fn section_wrapper(width: Width, content: Markup) -> Markup {
    html! {
        div class={ "wrapper wrapper--" (width.as_str()) } {
            (content)
        }
    }
}

/// Script accent, title and lead. Renders nothing when all three are blank.
pub fn section_header(header: SectionHeader<'_>) -> Markup {
    html! {
        @if !header.is_empty() {
            header.section-header {
                @if !header.script_accent.trim().is_empty() {
                    p.section-header__accent { (header.script_accent) }
                }
                @if !header.title.trim().is_empty() {
                    h2.section-header__title { (header.title) }
                }
                @if !header.lead.trim().is_empty() {
                    p.section-header__lead { (markdown_inline(header.lead)) }
                }
            }
        }
    }
}

/// A full section: [`section`] + [`section_wrapper`] + [`section_header`] + body.
pub fn section_shell(
    ctx: &BlockContext,
    kind: &str,
    fields: &SectionFields,
    body: Markup,
) -> Markup {
    let options = fields.options();
    section(
        ctx,
        kind,
        &options,
        section_wrapper(
            options.width,
            html! {
                (section_header(fields.header()))
                div.section-body { (body) }
            },
        ),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardVariant {
    #[default]
    Plain,
    Elevated,
    Outline,
}

impl CardVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            CardVariant::Plain => "plain",
            CardVariant::Elevated => "elevated",
            CardVariant::Outline => "outline",
        }
    }
}

pub fn card(variant: CardVariant, content: Markup) -> Markup {
    html! {
        div class={ "card card--" (variant.as_str()) } {
            (content)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aspect {
    Square,
    #[default]
    Landscape,
    Portrait,
    Wide,
}

impl Aspect {
    pub fn as_str(self) -> &'static str {
        match self {
            Aspect::Square => "square",
            Aspect::Landscape => "landscape",
            Aspect::Portrait => "portrait",
            Aspect::Wide => "wide",
        }
    }
}

/// A lazily loaded image in a fixed-aspect frame. Empty assets render nothing.
pub fn media(asset: &Asset, aspect: Aspect) -> Markup {
    html! {
        @if !asset.is_empty() {
            figure class={ "media media--" (aspect.as_str()) } {
                img src=(asset.url) alt=(asset.alt) loading="lazy" decoding="async";
            }
        }
    }
}
