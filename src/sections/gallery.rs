//! Gallery: a grid of venue photographs.

use super::BlockContext;
use super::primitives::{Aspect, SectionFields, media, section_shell};
use crate::content::Asset;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Gallery {
    #[serde(flatten)]
    pub section: SectionFields,
    pub images: Vec<Asset>,
    /// `grid` (uniform squares) or `mosaic` (first image spans two cells).
    pub layout: String,
}

pub fn render(gallery: &Gallery, ctx: &BlockContext) -> Markup {
    let mosaic = gallery.layout.trim().eq_ignore_ascii_case("mosaic");
    let images: Vec<&Asset> = gallery.images.iter().filter(|a| !a.is_empty()).collect();
    let body = html! {
        @if !images.is_empty() {
            div class={ "gallery__grid gallery__grid--" (if mosaic { "mosaic" } else { "grid" }) } {
                @for (idx, image) in images.iter().enumerate() {
                    @let aspect = if mosaic && idx == 0 { Aspect::Landscape } else { Aspect::Square };
                    (media(image, aspect))
                }
            }
        }
    };
    section_shell(ctx, "gallery", &gallery.section, body)
}
