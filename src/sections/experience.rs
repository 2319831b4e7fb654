//! Experience: the numbered "how your day unfolds" timeline.

use super::primitives::{Aspect, SectionFields, media, section_shell};
use super::{BlockContext, markdown};
use crate::content::Asset;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(flatten)]
    pub section: SectionFields,
    pub steps: Vec<ExperienceStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceStep {
    /// Free text label such as `"4:00 pm"`; the step number is used when blank.
    pub label: String,
    pub title: String,
    pub description: String,
    pub image: Asset,
}

pub fn render(experience: &Experience, ctx: &BlockContext) -> Markup {
    let body = html! {
        ol.experience__steps {
            @for (idx, step) in experience.steps.iter().enumerate() {
                li.experience__step {
                    span.experience__label {
                        @if step.label.trim().is_empty() {
                            (format!("{:02}", idx + 1))
                        } @else {
                            (step.label)
                        }
                    }
                    div.experience__text {
                        h3 { (step.title) }
                        (markdown(&step.description))
                    }
                    (media(&step.image, Aspect::Portrait))
                }
            }
        }
    };
    section_shell(ctx, "experience", &experience.section, body)
}
