//! Brand proof: press logos and couple testimonials.

use super::primitives::{CardVariant, SectionFields, card, section_shell};
use super::{BlockContext, markdown_inline};
use crate::content::Asset;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandProof {
    #[serde(flatten)]
    pub section: SectionFields,
    /// "As featured in" logos.
    pub logos: Vec<Asset>,
    pub testimonials: Vec<Testimonial>,
    /// Aggregate rating shown as text, e.g. `"4.9 / 5 on 120 reviews"`.
    pub rating: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    /// e.g. `"Married June 2024"`.
    pub detail: String,
}

pub fn render(proof: &BrandProof, ctx: &BlockContext) -> Markup {
    let logos: Vec<&Asset> = proof.logos.iter().filter(|l| !l.is_empty()).collect();
    let body = html! {
        @if !proof.rating.trim().is_empty() {
            p.brand-proof__rating { (proof.rating) }
        }
        @if !logos.is_empty() {
            ul.brand-proof__logos {
                @for logo in logos {
                    li { img src=(logo.url) alt=(logo.alt) loading="lazy"; }
                }
            }
        }
        div.brand-proof__testimonials {
            @for testimonial in proof.testimonials.iter().filter(|t| !t.quote.trim().is_empty()) {
                (card(CardVariant::Plain, html! {
                    blockquote.testimonial {
                        p { (markdown_inline(&testimonial.quote)) }
                        footer {
                            cite { (testimonial.author) }
                            @if !testimonial.detail.trim().is_empty() {
                                span.testimonial__detail { (testimonial.detail) }
                            }
                        }
                    }
                }))
            }
        }
    };
    section_shell(ctx, "brand-proof", &proof.section, body)
}
