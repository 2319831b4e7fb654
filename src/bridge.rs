//! Visual-editor live preview.
//!
//! While a page is open inside the CMS editor (the URL carries `_storyblok`),
//! the page loads `static/bridge.js`. The script loads the editor's bridge
//! (primary script, else the legacy one polled every [`POLL_INTERVAL`] up to
//! [`MAX_POLLS`] times) and forwards every `input`, `published` and `change`
//! event to `POST /api/preview/event`, which runs [`plan_update`].
//!
//! An `input` event carrying story content becomes an [`UpdatePlan`]: every
//! content node with both `_uid` and `background_variant` becomes a `data-bg`
//! patch on the section with that uid. Anything else (`published`, `change`,
//! malformed content) plans a reload, as does a patch whose target is gone.
//!
//! ## Generations
//!
//! The browser stamps each forwarded event with a new generation and the plan
//! echoes it back. Responses can arrive out of order, so the browser applies a
//! plan only while its generation is still the newest one sent; an older plan
//! has been superseded by one still in flight and is dropped.

use crate::content::Asset;
use crate::sections::primitives::{Background, SectionFields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const PREVIEW_QUERY_PARAM: &str = "_storyblok";
pub const PRIMARY_SCRIPT: &str = "https://app.storyblok.com/f/storyblok-v2-latest.js";
pub const LEGACY_SCRIPT: &str = "https://app.storyblok.com/f/storyblok-latest.js";
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Polls of the legacy script before giving up (5 seconds).
pub const MAX_POLLS: u32 = 50;
pub const PATCH_ATTRIBUTE: &str = "data-bg";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("malformed content node: {0}")]
    MalformedNode(String),
}

/// Whether a query string asks for live preview.
pub fn is_preview_query(query: &str) -> bool {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .any(|(name, _)| name == PREVIEW_QUERY_PARAM)
}

// =============================================================================
// Events and plans
// =============================================================================

/// An event as delivered by the editor's bridge script.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeEvent {
    pub action: String,
    #[serde(default)]
    pub story: Option<Value>,
}

/// Body of `POST /api/preview/event`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewEventRequest {
    /// Render generation the page was at when the event arrived.
    pub generation: u64,
    pub event: BridgeEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub uid: String,
    pub attribute: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum UpdatePlan {
    Patch { generation: u64, patches: Vec<Patch> },
    Reload,
}

/// Turn one event into a plan against `generation`.
pub fn plan_update(event: &BridgeEvent, generation: u64) -> UpdatePlan {
    if event.action != "input" {
        return UpdatePlan::Reload;
    }
    let Some(content) = event.story.as_ref().and_then(|story| story.get("content")) else {
        return UpdatePlan::Reload;
    };
    match background_patches(content) {
        Ok(patches) => UpdatePlan::Patch {
            generation,
            patches,
        },
        Err(err) => {
            tracing::debug!(error = %err, "content walk failed, reloading");
            UpdatePlan::Reload
        }
    }
}

/// Collect a `data-bg` patch for every node carrying `_uid` and
/// `background_variant`, in document order.
pub fn background_patches(content: &Value) -> Result<Vec<Patch>, BridgeError> {
    let mut patches = Vec::new();
    walk(content, &mut patches)?;
    Ok(patches)
}

/// The style fields of any section node. `image` covers the hero, whose
/// own image doubles as the section background.
#[derive(Deserialize)]
struct StyledNode {
    #[serde(flatten)]
    section: SectionFields,
    #[serde(default)]
    image: Asset,
}

impl StyledNode {
    fn background(&self) -> Background {
        let mut options = self.section.options();
        if options.background == Background::Image && options.background_image.is_none() && !self.image.is_empty() {
            options.background_image = Some(self.image.url.clone());
        }
        options.effective_background()
    }
}

fn walk(node: &Value, patches: &mut Vec<Patch>) -> Result<(), BridgeError> {
    match node {
        Value::Object(map) => {
            if let (Some(uid), Some(_)) = (map.get("_uid"), map.get("background_variant")) {
                let uid = uid
                    .as_str()
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| BridgeError::MalformedNode(format!("_uid {uid}")))?;
                let styled: StyledNode = serde_json::from_value(node.clone())
                    .map_err(|e| BridgeError::MalformedNode(format!("{uid}: {e}")))?;
                patches.push(Patch {
                    uid: uid.to_string(),
                    attribute: PATCH_ATTRIBUTE,
                    value: styled.background().as_str().to_string(),
                });
            }
            map.values().try_for_each(|child| walk(child, patches))
        }
        Value::Array(items) => items.iter().try_for_each(|child| walk(child, patches)),
        _ => Ok(()),
    }
}
