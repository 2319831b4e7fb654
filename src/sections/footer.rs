//! Footer: venue contact details and link columns.

use super::BlockContext;
use super::primitives::{SectionFields, section_shell};
use crate::content::Link;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Footer {
    #[serde(flatten)]
    pub section: SectionFields,
    pub venue_name: String,
    /// Multi-line postal address.
    pub address: String,
    pub phone: String,
    pub email: String,
    pub links: Vec<FooterLink>,
    pub social_links: Vec<FooterLink>,
    pub copyright: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FooterLink {
    pub label: String,
    pub link: Link,
}

/// Render the footer. `site_name` fills in a blank venue name.
pub fn render(footer: &Footer, ctx: &BlockContext, site_name: &str) -> Markup {
    let venue = if footer.venue_name.trim().is_empty() {
        site_name
    } else {
        footer.venue_name.as_str()
    };
    let body = html! {
        div.footer__grid {
            address.footer__contact {
                strong.footer__venue { (venue) }
                @for line in super::lines(&footer.address) {
                    span.footer__address-line { (line) }
                }
                @if !footer.phone.trim().is_empty() {
                    a href={ "tel:" (footer.phone.replace(' ', "")) } { (footer.phone) }
                }
                @if !footer.email.trim().is_empty() {
                    a href={ "mailto:" (footer.email.trim()) } { (footer.email) }
                }
            }
            (link_list("footer__links", &footer.links))
            (link_list("footer__social", &footer.social_links))
        }
        @if !footer.copyright.trim().is_empty() {
            p.footer__copyright { (footer.copyright) }
        }
    };
    html! {
        footer.site-footer {
            (section_shell(ctx, "footer", &footer.section, body))
        }
    }
}

fn link_list(class: &str, links: &[FooterLink]) -> Markup {
    html! {
        @if links.iter().any(|l| !l.link.is_empty()) {
            ul class=(class) {
                @for item in links.iter().filter(|l| !l.link.is_empty()) {
                    li {
                        @if item.link.is_external() {
                            a href=(item.link.href) target="_blank" rel="noopener" { (item.label) }
                        } @else {
                            a href=(item.link.href) { (item.label) }
                        }
                    }
                }
            }
        }
    }
}
