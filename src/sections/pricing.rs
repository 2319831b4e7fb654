//! Pricing: package tiers shown as cards.

use super::primitives::{CardVariant, SectionFields, card, section_shell};
use super::{BlockContext, cta, lines, markdown_inline};
use crate::content::Link;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pricing {
    #[serde(flatten)]
    pub section: SectionFields,
    pub tiers: Vec<PricingTier>,
    /// Small print under the tiers (inline markdown).
    pub note: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PricingTier {
    pub name: String,
    /// Display price, e.g. `"$8,500"`. Kept as text: the CMS stores ranges
    /// and "from" prices too.
    pub price: String,
    /// e.g. `"per event"`, `"Friday & Sunday"`.
    pub period: String,
    pub description: String,
    /// One feature per line.
    pub features: String,
    pub highlighted: bool,
    pub badge: String,
    pub cta_label: String,
    pub cta_link: Link,
}

pub fn render(pricing: &Pricing, ctx: &BlockContext) -> Markup {
    let body = html! {
        div.pricing__tiers data-count=(pricing.tiers.len()) {
            @for tier in &pricing.tiers {
                (render_tier(tier))
            }
        }
        @if !pricing.note.trim().is_empty() {
            p.pricing__note { (markdown_inline(&pricing.note)) }
        }
    };
    section_shell(ctx, "pricing", &pricing.section, body)
}

fn render_tier(tier: &PricingTier) -> Markup {
    let variant = if tier.highlighted {
        CardVariant::Elevated
    } else {
        CardVariant::Outline
    };
    card(
        variant,
        html! {
            div.pricing-tier.pricing-tier--highlighted[tier.highlighted] {
                @if !tier.badge.trim().is_empty() {
                    span.pricing-tier__badge { (tier.badge) }
                }
                h3.pricing-tier__name { (tier.name) }
                p.pricing-tier__price {
                    span.pricing-tier__amount { (tier.price) }
                    @if !tier.period.trim().is_empty() {
                        " "
                        span.pricing-tier__period { (tier.period) }
                    }
                }
                @if !tier.description.trim().is_empty() {
                    p.pricing-tier__description { (markdown_inline(&tier.description)) }
                }
                ul.pricing-tier__features {
                    @for feature in lines(&tier.features) {
                        li { (feature) }
                    }
                }
                (cta(&tier.cta_label, &tier.cta_link, "button button--primary"))
            }
        },
    )
}
