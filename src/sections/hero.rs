//! Hero: the full-width opening section of a page.

use super::primitives::{Aspect, Background, SectionFields, media, section, section_header, section_wrapper};
use super::{BlockContext, cta};
use crate::content::{Asset, Link};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Hero {
    #[serde(flatten)]
    pub section: SectionFields,
    /// Main image. When the section background is `image` and no
    /// `background_image` is set, this image becomes the background.
    pub image: Asset,
    pub cta_label: String,
    pub cta_link: Link,
    pub secondary_cta_label: String,
    pub secondary_cta_link: Link,
}

pub fn render(hero: &Hero, ctx: &BlockContext) -> Markup {
    let mut options = hero.section.options();
    let image_as_background = options.background == Background::Image
        && options.background_image.is_none()
        && !hero.image.is_empty();
    if image_as_background {
        options.background_image = Some(hero.image.url.clone());
    }

    let body = html! {
        div.hero__content {
            (section_header(hero.section.header()))
            div.hero__actions {
                (cta(&hero.cta_label, &hero.cta_link, "button button--primary"))
                (cta(&hero.secondary_cta_label, &hero.secondary_cta_link, "button button--ghost"))
            }
        }
        @if !image_as_background {
            (media(&hero.image, Aspect::Wide))
        }
    };
    section(ctx, "hero", &options, section_wrapper(options.width, body))
}
