//! Stories and content blocks, decoded at the fetch boundary.
//!
//! The content API returns untyped JSON. Everything downstream works with
//! [`Story`] and [`ContentBlock`], whose [`Block`] payload is a closed sum
//! type: one variant per known component plus [`Block::Unknown`], which keeps
//! the raw JSON for components this site has no renderer for.
//!
//! A block's `component` string is kept verbatim next to the decoded payload.
//! The registry dispatches on that string, so a legacy alias such as
//! `hero_section` decodes as [`Block::Hero`] but only resolves in the editor
//! registry, which lists the alias.

use super::ContentError;
use crate::sections::{
    alternating::AlternatingBlocks, brand_proof::BrandProof, experience::Experience, faq::Faq,
    footer::Footer, gallery::Gallery, hero::Hero, map::MapBlock, pricing::Pricing, spaces::Spaces,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Known block kinds and the component names that decode to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Hero,
    Pricing,
    Gallery,
    Faq,
    Footer,
    Map,
    Experience,
    AlternatingBlocks,
    BrandProof,
    Spaces,
}

impl BlockKind {
    pub const ALL: [BlockKind; 10] = [
        BlockKind::Hero,
        BlockKind::Pricing,
        BlockKind::Gallery,
        BlockKind::Faq,
        BlockKind::Footer,
        BlockKind::Map,
        BlockKind::Experience,
        BlockKind::AlternatingBlocks,
        BlockKind::BrandProof,
        BlockKind::Spaces,
    ];

    /// The component name used by current content.
    pub fn canonical_name(self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Pricing => "pricing",
            BlockKind::Gallery => "gallery",
            BlockKind::Faq => "faq",
            BlockKind::Footer => "footer",
            BlockKind::Map => "map",
            BlockKind::Experience => "experience",
            BlockKind::AlternatingBlocks => "alternating_blocks",
            BlockKind::BrandProof => "brand_proof",
            BlockKind::Spaces => "spaces",
        }
    }

    /// Names used by content created before the component rename.
    pub fn legacy_names(self) -> &'static [&'static str] {
        match self {
            BlockKind::Hero => &["hero_section"],
            BlockKind::Pricing => &["pricing_table"],
            BlockKind::Gallery => &["image_gallery"],
            BlockKind::Faq => &["faq_section"],
            BlockKind::Footer => &["site_footer"],
            _ => &[],
        }
    }

    pub fn from_component(name: &str) -> Option<BlockKind> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.canonical_name() == name || kind.legacy_names().contains(&name))
    }
}

/// Decoded payload of a content block.
#[derive(Debug, Clone)]
pub enum Block {
    Hero(Hero),
    Pricing(Pricing),
    Gallery(Gallery),
    Faq(Faq),
    Footer(Footer),
    Map(MapBlock),
    Experience(Experience),
    AlternatingBlocks(AlternatingBlocks),
    BrandProof(BrandProof),
    Spaces(Spaces),
    /// A component this site does not know; the raw JSON is kept.
    Unknown(Value),
}

impl Block {
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            Block::Hero(_) => BlockKind::Hero,
            Block::Pricing(_) => BlockKind::Pricing,
            Block::Gallery(_) => BlockKind::Gallery,
            Block::Faq(_) => BlockKind::Faq,
            Block::Footer(_) => BlockKind::Footer,
            Block::Map(_) => BlockKind::Map,
            Block::Experience(_) => BlockKind::Experience,
            Block::AlternatingBlocks(_) => BlockKind::AlternatingBlocks,
            Block::BrandProof(_) => BlockKind::BrandProof,
            Block::Spaces(_) => BlockKind::Spaces,
            Block::Unknown(_) => return None,
        })
    }
}

/// One entry of a page body.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub uid: String,
    /// The `component` discriminator exactly as stored in the CMS.
    pub component: String,
    /// Visual-editor comment, present on draft content only.
    pub editable: Option<String>,
    pub block: Block,
}

impl ContentBlock {
    /// Decode one block. `component` is required; a known component whose
    /// fields do not match its schema is an error, an unknown one is kept as
    /// [`Block::Unknown`].
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        let component = value
            .get("component")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ContentError::InvalidBlock {
                component: None,
                reason: "missing `component` field".to_string(),
            })?
            .to_string();
        let uid = value
            .get("_uid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let editable = value
            .get("_editable")
            .and_then(Value::as_str)
            .map(str::to_string);

        let block = match BlockKind::from_component(&component) {
            Some(kind) => decode_kind(kind, &component, value)?,
            None => Block::Unknown(value),
        };

        Ok(ContentBlock {
            uid,
            component,
            editable,
            block,
        })
    }
}

fn decode_kind(kind: BlockKind, component: &str, value: Value) -> Result<Block, ContentError> {
    fn typed<T: DeserializeOwned>(component: &str, value: Value) -> Result<T, ContentError> {
        serde_json::from_value(value).map_err(|e| ContentError::InvalidBlock {
            component: Some(component.to_string()),
            reason: e.to_string(),
        })
    }

    Ok(match kind {
        BlockKind::Hero => Block::Hero(typed(component, value)?),
        BlockKind::Pricing => Block::Pricing(typed(component, value)?),
        BlockKind::Gallery => Block::Gallery(typed(component, value)?),
        BlockKind::Faq => Block::Faq(typed(component, value)?),
        BlockKind::Footer => Block::Footer(typed(component, value)?),
        BlockKind::Map => Block::Map(typed(component, value)?),
        BlockKind::Experience => Block::Experience(typed(component, value)?),
        BlockKind::AlternatingBlocks => Block::AlternatingBlocks(typed(component, value)?),
        BlockKind::BrandProof => Block::BrandProof(typed(component, value)?),
        BlockKind::Spaces => Block::Spaces(typed(component, value)?),
    })
}

/// The content document for one page.
#[derive(Debug, Clone)]
pub struct Story {
    pub id: u64,
    pub uuid: String,
    pub name: String,
    pub slug: String,
    pub full_slug: String,
    /// `None` for drafts that were never published.
    pub published_at: Option<String>,
    pub meta: PageMeta,
    pub blocks: Vec<ContentBlock>,
}

impl Story {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Parse a `GET /v2/cdn/stories/{slug}` response body.
    pub fn from_response(body: &[u8]) -> Result<Self, ContentError> {
        let response: StoryResponse = serde_json::from_slice(body)?;
        Self::from_raw(response.story)
    }

    /// Build a story from the `story` object of a response or a bridge event.
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        let raw: RawStory = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawStory) -> Result<Self, ContentError> {
        let meta: PageMeta = serde_json::from_value(raw.content.clone()).unwrap_or_default();
        let blocks = page_blocks(raw.content)?;
        Ok(Story {
            id: raw.id,
            uuid: raw.uuid,
            name: raw.name,
            slug: raw.slug,
            full_slug: raw.full_slug,
            published_at: raw.published_at,
            meta,
            blocks,
        })
    }
}

/// A `page` content type holds its blocks in `body`; any other root content
/// is itself a single block.
fn page_blocks(content: Value) -> Result<Vec<ContentBlock>, ContentError> {
    match content {
        Value::Object(mut map) => match map.remove("body") {
            Some(Value::Array(body)) => body.into_iter().map(ContentBlock::from_value).collect(),
            _ if map.get("component").and_then(Value::as_str) == Some("page") => Ok(Vec::new()),
            removed => {
                if let Some(value) = removed {
                    map.insert("body".to_string(), value);
                }
                Ok(vec![ContentBlock::from_value(Value::Object(map))?])
            }
        },
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![ContentBlock::from_value(other)?]),
    }
}

/// SEO fields of the page content type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    pub meta_title: String,
    pub meta_description: String,
}

#[derive(Deserialize)]
struct StoryResponse {
    story: RawStory,
}

#[derive(Deserialize)]
struct RawStory {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    full_slug: String,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    content: Value,
}
