//! Management API: the one authoring call the site needs, publishing a story.

use super::ContentError;
use crate::config::{ConfigError, Secrets};
use crate::http::{HttpRequest, Transport};
use url::Url;

/// Management API base URL for a region code.
pub fn management_host(region: &str) -> Option<&'static str> {
    match region {
        "eu" => Some("https://mapi.storyblok.com"),
        "us" => Some("https://api-us.storyblok.com"),
        "ap" => Some("https://api-ap.storyblok.com"),
        "ca" => Some("https://api-ca.storyblok.com"),
        "cn" => Some("https://app.storyblokchina.cn"),
        _ => None,
    }
}

pub fn publish_url(region: &str, space_id: &str, story_id: u64) -> Result<Url, ContentError> {
    let host = management_host(region).ok_or_else(|| {
        ConfigError::Validation(format!("unknown content region {region:?}"))
    })?;
    let space: u64 = space_id.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("STORYBLOK_SPACE_ID must be numeric, got {space_id:?}"))
    })?;
    Ok(Url::parse(&format!(
        "{host}/v1/spaces/{space}/stories/{story_id}/publish"
    ))?)
}

/// Publish the current draft of `story_id`.
///
/// Needs `STORYBLOK_SPACE_ID` and `STORYBLOK_MANAGEMENT_TOKEN`; both are
/// checked before any request is sent.
pub fn publish_story(
    transport: &dyn Transport,
    secrets: &Secrets,
    region: &str,
    story_id: u64,
) -> Result<(), ContentError> {
    let space_id = secrets.space_id()?;
    let token = secrets.management_token()?;
    let url = publish_url(region, space_id, story_id)?;

    let response = transport.send(
        HttpRequest::get(url)
            .header("Authorization", token)
            .header("Accept", "application/json"),
    )?;
    if !response.is_success() {
        return Err(ContentError::Upstream {
            status: response.status,
            body: response.body_excerpt(512),
        });
    }
    tracing::info!(story_id, "story published");
    Ok(())
}
