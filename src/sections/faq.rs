//! FAQ: questions as native `<details>` disclosures.

use super::primitives::{SectionFields, section_shell};
use super::{BlockContext, markdown};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Faq {
    #[serde(flatten)]
    pub section: SectionFields,
    pub items: Vec<FaqItem>,
    /// Open the first item on load.
    pub open_first: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub question: String,
    /// Markdown.
    pub answer: String,
}

pub fn render(faq: &Faq, ctx: &BlockContext) -> Markup {
    let body = html! {
        div.faq__list {
            @for (idx, item) in faq.items.iter().filter(|i| !i.question.trim().is_empty()).enumerate() {
                details.faq__item open[faq.open_first && idx == 0] {
                    summary.faq__question { (item.question) }
                    div.faq__answer { (markdown(&item.answer)) }
                }
            }
        }
    };
    section_shell(ctx, "faq", &faq.section, body)
}
