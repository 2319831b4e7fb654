//! Alternating blocks: image/text rows whose image side flips every row.

use super::primitives::{Aspect, SectionFields, media, section_shell};
use super::{BlockContext, cta, markdown};
use crate::content::{Asset, Link};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlternatingBlocks {
    #[serde(flatten)]
    pub section: SectionFields,
    pub items: Vec<AlternatingItem>,
    /// Put the first image on the right instead of the left.
    pub start_right: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlternatingItem {
    pub title: String,
    pub body: String,
    pub image: Asset,
    pub cta_label: String,
    pub cta_link: Link,
}

/// Image side for row `idx`.
pub fn image_side(idx: usize, start_right: bool) -> &'static str {
    if (idx % 2 == 0) != start_right {
        "left"
    } else {
        "right"
    }
}

pub fn render(blocks: &AlternatingBlocks, ctx: &BlockContext) -> Markup {
    let body = html! {
        @for (idx, item) in blocks.items.iter().enumerate() {
            div class={ "alternating__row alternating__row--image-" (image_side(idx, blocks.start_right)) } {
                (media(&item.image, Aspect::Landscape))
                div.alternating__text {
                    h3 { (item.title) }
                    (markdown(&item.body))
                    (cta(&item.cta_label, &item.cta_link, "link-arrow"))
                }
            }
        }
    };
    section_shell(ctx, "alternating", &blocks.section, body)
}
