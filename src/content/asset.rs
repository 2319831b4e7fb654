//! Canonical asset and link references.
//!
//! Storyblok hands out the same concept in several shapes: an asset field is
//! an object (`{"filename": "...", "alt": "..."}`), older content stores a bare
//! URL string, and an empty asset is an object with `filename: ""` or `null`.
//! Links are either a multilink object or a string. Both are normalized here,
//! during decoding, so section renderers only ever see [`Asset`] and [`Link`].

use serde::{Deserialize, Deserializer, Serialize};

/// An image or file reference, normalized to a URL plus alt text.
///
/// An empty `url` means "no asset"; renderers check [`Asset::is_empty`]
/// instead of dealing with `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub url: String,
    pub alt: String,
}

impl Asset {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: normalize_url(&url.into()),
            alt: alt.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAsset {
    Url(String),
    Object {
        #[serde(default)]
        filename: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        alt: Option<String>,
    },
    Null(()),
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let asset = match RawAsset::deserialize(deserializer)? {
            RawAsset::Url(url) => Asset::new(url.trim(), ""),
            RawAsset::Object { filename, url, alt } => {
                let url = filename
                    .filter(|f| !f.trim().is_empty())
                    .or(url)
                    .unwrap_or_default();
                Asset::new(url.trim(), alt.unwrap_or_default())
            }
            RawAsset::Null(()) => Asset::default(),
        };
        Ok(asset)
    }
}

/// Protocol-relative CDN URLs (`//a.storyblok.com/...`) become `https:`.
fn normalize_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// A navigable link, normalized to an `href`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.href.is_empty()
    }

    /// Whether the link leaves the site (rendered with `rel="noopener"`).
    pub fn is_external(&self) -> bool {
        self.href.starts_with("http://") || self.href.starts_with("https://")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLink {
    Href(String),
    Multilink {
        #[serde(default)]
        linktype: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        cached_url: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
    Null(()),
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let href = match RawLink::deserialize(deserializer)? {
            RawLink::Href(href) => href.trim().to_string(),
            RawLink::Multilink {
                linktype,
                url,
                cached_url,
                email,
            } => match linktype.as_deref() {
                Some("story") => story_href(cached_url.as_deref().unwrap_or_default()),
                Some("email") => email
                    .or(url)
                    .filter(|e| !e.is_empty())
                    .map(|e| format!("mailto:{e}"))
                    .unwrap_or_default(),
                _ => url
                    .filter(|u| !u.is_empty())
                    .or(cached_url)
                    .unwrap_or_default(),
            },
            RawLink::Null(()) => String::new(),
        };
        Ok(Link { href })
    }
}

/// Internal story links are stored as `full_slug`; the home story maps to `/`.
fn story_href(full_slug: &str) -> String {
    let slug = full_slug.trim_matches('/');
    if slug.is_empty() || slug == "home" {
        "/".to_string()
    } else {
        format!("/{slug}")
    }
}
