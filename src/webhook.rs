//! CMS publish webhook.
//!
//! The CMS posts a small JSON document whenever a story changes. The body is
//! signed with HMAC-SHA1 using the shared webhook secret and the signature
//! arrives in the `webhook-signature` header as `sha1=<hex>` (bare hex is
//! accepted too). A verified event triggers one POST to the deploy build
//! hook. Replays are not de-duplicated: every verified delivery triggers a
//! build.

use crate::config::{ConfigError, Secrets};
use crate::http::{HttpRequest, Transport};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use thiserror::Error;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "webhook-signature";

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("missing {SIGNATURE_HEADER} header")]
    MissingSignature,
    #[error("webhook signature does not match")]
    InvalidSignature,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("invalid build hook URL: {0}")]
    HookUrl(#[from] url::ParseError),
    #[error("build hook failed: {0}")]
    BuildHook(String),
}

impl WebhookError {
    /// HTTP status the revalidate endpoint answers with.
    pub fn status(&self) -> u16 {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => 401,
            WebhookError::Payload(_) => 400,
            WebhookError::Config(_) | WebhookError::HookUrl(_) | WebhookError::BuildHook(_) => 500,
        }
    }
}

/// The fields of a CMS webhook body the site uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookPayload {
    pub action: String,
    pub story_id: Option<u64>,
    pub full_slug: Option<String>,
}

impl WebhookPayload {
    /// Slug when the CMS sent one, else the story id.
    pub fn story(&self) -> serde_json::Value {
        match (&self.full_slug, self.story_id) {
            (Some(slug), _) => serde_json::Value::String(slug.clone()),
            (None, Some(id)) => serde_json::Value::from(id),
            (None, None) => serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevalidateResponse {
    pub success: bool,
    pub story: serde_json::Value,
    pub action: String,
}

/// Hex HMAC-SHA1 of `body`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = mac(secret);
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

fn mac(secret: &str) -> HmacSha1 {
    <HmacSha1 as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length")
}

/// Check a `sha1=<hex>` (or bare hex) signature in constant time.
pub fn verify_signature(secret: &str, body: &[u8], header: Option<&str>) -> Result<(), WebhookError> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(WebhookError::MissingSignature)?;
    let hex_digest = header.strip_prefix("sha1=").unwrap_or(header);
    let expected = hex::decode(hex_digest).map_err(|_| WebhookError::InvalidSignature)?;
    let mut mac = mac(secret);
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}

/// POST the build hook once.
pub fn trigger_build_hook(
    transport: &dyn Transport,
    hook_url: &str,
    payload: &WebhookPayload,
) -> Result<(), WebhookError> {
    let url = Url::parse(hook_url)?;
    let body = serde_json::to_vec(&serde_json::json!({
        "trigger": "cms-webhook",
        "action": payload.action,
        "story": payload.story(),
    }))?;
    let response = transport
        .send(HttpRequest::post(url, body).header("Content-Type", "application/json"))
        .map_err(|e| WebhookError::BuildHook(e.to_string()))?;
    if !response.is_success() {
        return Err(WebhookError::BuildHook(format!(
            "HTTP {}: {}",
            response.status,
            response.body_excerpt(200)
        )));
    }
    Ok(())
}

/// Verify, decode and act on one webhook delivery.
///
/// Configuration is checked first so a misconfigured deploy answers 500
/// regardless of what was sent.
pub fn handle_revalidate(
    transport: &dyn Transport,
    secrets: &Secrets,
    body: &[u8],
    signature: Option<&str>,
) -> Result<RevalidateResponse, WebhookError> {
    let secret = secrets.webhook_secret()?;
    let hook_url = secrets.build_hook_url()?;

    verify_signature(secret, body, signature)?;
    let payload: WebhookPayload = serde_json::from_slice(body)?;

    trigger_build_hook(transport, hook_url, &payload)?;
    tracing::info!(action = %payload.action, story = %payload.story(), "build hook triggered");

    Ok(RevalidateResponse {
        success: true,
        story: payload.story(),
        action: payload.action,
    })
}
