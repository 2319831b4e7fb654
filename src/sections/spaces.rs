//! Spaces: the venue's rooms and grounds with capacities.

use super::primitives::{Aspect, CardVariant, SectionFields, card, media, section_shell};
use super::{BlockContext, cta, markdown_inline};
use crate::content::{Asset, Link};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Spaces {
    #[serde(flatten)]
    pub section: SectionFields,
    pub spaces: Vec<Space>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Space {
    pub name: String,
    pub description: String,
    /// Free text (`"Up to 180 seated"`), the CMS field is a plain text input.
    pub capacity: String,
    pub image: Asset,
    pub cta_label: String,
    pub cta_link: Link,
}

pub fn render(spaces: &Spaces, ctx: &BlockContext) -> Markup {
    let body = html! {
        div.spaces__grid {
            @for space in spaces.spaces.iter().filter(|s| !s.name.trim().is_empty()) {
                (card(CardVariant::Elevated, html! {
                    (media(&space.image, Aspect::Landscape))
                    div.space__body {
                        h3.space__name { (space.name) }
                        @if !space.capacity.trim().is_empty() {
                            p.space__capacity { (space.capacity) }
                        }
                        @if !space.description.trim().is_empty() {
                            p.space__description { (markdown_inline(&space.description)) }
                        }
                        (cta(&space.cta_label, &space.cta_link, "link-arrow"))
                    }
                }))
            }
        }
    };
    section_shell(ctx, "spaces", &spaces.section, body)
}
