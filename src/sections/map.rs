//! Map: location with an embedded map and a directions link.

use super::primitives::{CardVariant, SectionFields, card, section_shell};
use super::{BlockContext, cta, lines, markdown};
use crate::content::Link;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapBlock {
    #[serde(flatten)]
    pub section: SectionFields,
    pub address: String,
    /// Embed URL from the map provider's share dialog.
    pub embed_url: String,
    pub directions_label: String,
    pub directions_link: Link,
    /// Markdown travel notes (parking, shuttles, nearest station).
    pub travel_notes: String,
}

/// Only `https` embeds are rendered into the iframe.
fn safe_embed(url: &str) -> Option<&str> {
    let url = url.trim();
    url.starts_with("https://").then_some(url)
}

pub fn render(map: &MapBlock, ctx: &BlockContext) -> Markup {
    let body = html! {
        div.map__layout {
            @if let Some(src) = safe_embed(&map.embed_url) {
                div.map__frame {
                    iframe src=(src) title={ "Map of " (map.address.lines().next().unwrap_or("the venue")) }
                        loading="lazy" referrerpolicy="no-referrer-when-downgrade" {}
                }
            }
            (card(CardVariant::Plain, html! {
                address.map__address {
                    @for line in lines(&map.address) {
                        span { (line) }
                    }
                }
                @if !map.travel_notes.trim().is_empty() {
                    div.map__notes { (markdown(&map.travel_notes)) }
                }
                (cta(&map.directions_label, &map.directions_link, "button button--ghost"))
            }))
        }
    };
    section_shell(ctx, "map", &map.section, body)
}
