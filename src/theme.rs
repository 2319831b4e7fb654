//! Theme and brand selection.
//!
//! Two independent switches, each stored in its own cookie and mirrored to
//! `localStorage` by the browser script:
//!
//! | Switch | Values | Cookie | Root attribute |
//! |--------|--------|--------|----------------|
//! | [`Theme`] | `light`, `dark` | `rr.theme` | `data-theme` |
//! | [`Brand`] | `classic`, `garden` | `rr.brand` | `data-brand` |
//!
//! The server injects the cookie values into the `<html>` tag of every HTML
//! response so the first paint already has the right colors. When no cookie
//! is present the browser resolves the theme itself: `localStorage`, then
//! `prefers-color-scheme` (see [`resolve_theme`], mirrored in
//! `static/theme.js`).

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const THEME_COOKIE: &str = "rr.theme";
pub const BRAND_COOKIE: &str = "rr.brand";
/// One year.
pub const COOKIE_MAX_AGE: u32 = 31_536_000;

/// Attributes on the document root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootAttributes(BTreeMap<String, String>);

impl RootAttributes {
    pub fn set(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ATTRIBUTE: &'static str = "data-theme";

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Set `data-theme`, leaving every other attribute alone.
    pub fn apply(self, root: &mut RootAttributes) {
        root.set(Self::ATTRIBUTE, self.as_str());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Brand {
    #[default]
    Classic,
    Garden,
}

impl Brand {
    pub const ATTRIBUTE: &'static str = "data-brand";

    pub fn as_str(self) -> &'static str {
        match self {
            Brand::Classic => "classic",
            Brand::Garden => "garden",
        }
    }

    pub fn parse(value: &str) -> Option<Brand> {
        match value.trim() {
            "classic" => Some(Brand::Classic),
            "garden" => Some(Brand::Garden),
            _ => None,
        }
    }

    /// Set `data-brand`, leaving every other attribute alone.
    pub fn apply(self, root: &mut RootAttributes) {
        root.set(Self::ATTRIBUTE, self.as_str());
    }
}

/// Theme to use when nothing was chosen server-side: cookie first, then the
/// value stored in `localStorage`, then the system color scheme.
pub fn resolve_theme(cookie: Option<Theme>, stored: Option<Theme>, prefers_dark: bool) -> Theme {
    cookie.or(stored).unwrap_or(if prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    })
}

/// Theme and brand as sent by the browser. Unknown values count as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Option<Theme>,
    pub brand: Option<Brand>,
}

impl Preferences {
    /// Parse a `Cookie` request header.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut prefs = Preferences::default();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            match name.trim() {
                THEME_COOKIE => prefs.theme = Theme::parse(value),
                BRAND_COOKIE => prefs.brand = Brand::parse(value),
                _ => {}
            }
        }
        prefs
    }

    /// Parse an `application/x-www-form-urlencoded` body
    /// (`theme=dark&brand=garden`).
    pub fn from_form(body: &[u8]) -> Self {
        let mut prefs = Preferences::default();
        for (name, value) in url::form_urlencoded::parse(body) {
            match name.as_ref() {
                "theme" => prefs.theme = Theme::parse(&value),
                "brand" => prefs.brand = Brand::parse(&value),
                _ => {}
            }
        }
        prefs
    }

    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.brand.is_none()
    }

    pub fn apply(&self, root: &mut RootAttributes) {
        if let Some(theme) = self.theme {
            theme.apply(root);
        }
        if let Some(brand) = self.brand {
            brand.apply(root);
        }
    }

    /// `Set-Cookie` values persisting the chosen switches.
    pub fn set_cookies(&self) -> Vec<String> {
        let mut cookies = Vec::new();
        if let Some(theme) = self.theme {
            cookies.push(set_cookie(THEME_COOKIE, theme.as_str()));
        }
        if let Some(brand) = self.brand {
            cookies.push(set_cookie(BRAND_COOKIE, brand.as_str()));
        }
        cookies
    }
}

pub fn set_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; Path=/; Max-Age={COOKIE_MAX_AGE}; SameSite=Lax")
}

// =============================================================================
// Response middleware
// =============================================================================

const SKIPPED_PREFIXES: &[&str] = &["/api/", "/assets/", "/favicon"];
const SKIPPED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "avif", "svg", "ico", "woff", "woff2", "ttf", "otf",
    "eot",
];

/// Whether the root-attribute middleware runs for this response.
pub fn should_inject(path: &str, content_type: Option<&str>) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if SKIPPED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return false;
    }
    let extension = path
        .rsplit('/')
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    if extension.is_some_and(|ext| SKIPPED_EXTENSIONS.contains(&ext.as_str())) {
        return false;
    }
    content_type.is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
}

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b([^>]*)>").expect("static regex"));
static ROOT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+data-(?:theme|brand)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("static regex")
});

/// Rewrite the first `<html>` tag so it carries the given root attributes.
/// Existing `data-theme`/`data-brand` attributes on the tag are replaced.
pub fn inject_root_attributes(document: &str, root: &RootAttributes) -> String {
    if root.iter().next().is_none() {
        return document.to_string();
    }
    HTML_TAG
        .replace(document, |caps: &regex::Captures| {
            let existing = ROOT_ATTR.replace_all(&caps[1], "");
            let mut tag = format!("<html{existing}");
            for (name, value) in root.iter() {
                tag.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
            }
            tag.push('>');
            tag
        })
        .into_owned()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
