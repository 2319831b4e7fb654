//! Content Delivery API client.
//!
//! One operation: fetch a story by slug, draft or published. The access token
//! is required before any request is built. Draft requests carry a `cv`
//! cache-buster that increases on every call so the CDN never serves a stale
//! draft. Every request asks intermediaries not to store the response.

use super::retry::{RetryPolicy, with_retry};
use super::{ContentError, Story};
use crate::config::{ConfigError, ContentConfig, region_host};
use crate::http::{HttpRequest, Transport};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Which revision of a story to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Draft,
    Published,
}

impl Version {
    pub fn as_str(self) -> &'static str {
        match self {
            Version::Draft => "draft",
            Version::Published => "published",
        }
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Version::Draft),
            "published" => Ok(Version::Published),
            other => Err(format!("unknown version {other:?} (expected draft or published)")),
        }
    }
}

pub struct ContentClient {
    transport: Arc<dyn Transport>,
    token: Option<String>,
    /// Region base URL, scheme included.
    host: &'static str,
    retry: RetryPolicy,
    cache_version: AtomicU64,
}

impl ContentClient {
    /// Build a client. A missing token is not an error here; it fails the
    /// first fetch, so commands that never fetch still run.
    pub fn new(
        transport: Arc<dyn Transport>,
        content: &ContentConfig,
        token: Option<String>,
        retry: RetryPolicy,
    ) -> Result<Self, ConfigError> {
        let host = region_host(&content.region).ok_or_else(|| {
            ConfigError::Validation(format!("unknown content region {:?}", content.region))
        })?;
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Ok(Self {
            transport,
            token,
            host,
            retry,
            cache_version: AtomicU64::new(seed),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Next draft cache-buster. Strictly increasing across threads.
    pub fn next_cache_version(&self) -> u64 {
        self.cache_version.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// `{host}/v2/cdn/stories/{slug}?token=..&version=..[&cv=..]`
    pub fn story_url(&self, slug: &str, version: Version) -> Result<Url, ContentError> {
        let token = self.token()?;
        let segments = slug_segments(slug)?;

        let mut url = Url::parse(&format!("{}/v2/cdn/stories", self.host))?;
        url.path_segments_mut()
            .map_err(|_| ContentError::InvalidSlug(slug.to_string()))?
            .extend(segments);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", token);
            query.append_pair("version", version.as_str());
            if version == Version::Draft {
                query.append_pair("cv", &self.next_cache_version().to_string());
            }
        }
        Ok(url)
    }

    /// Fetch one story, single attempt.
    pub fn fetch_story(&self, slug: &str, version: Version) -> Result<Story, ContentError> {
        let url = self.story_url(slug, version)?;
        let token = self.token()?;
        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-store")
            .header("Authorization", format!("Bearer {token}"));

        tracing::debug!(slug, version = version.as_str(), "fetching story");
        let response = self.transport.send(request)?;
        if !response.is_success() {
            return Err(ContentError::Upstream {
                status: response.status,
                body: response.body_excerpt(512),
            });
        }
        Story::from_response(&response.body)
    }

    /// [`fetch_story`](Self::fetch_story) under the client's retry policy.
    pub fn fetch_story_with_retry(&self, slug: &str, version: Version) -> Result<Story, ContentError> {
        with_retry(&self.retry, |_| self.fetch_story(slug, version))
    }

    fn token(&self) -> Result<&str, ContentError> {
        self.token
            .as_deref()
            .ok_or(ContentError::Config(ConfigError::MissingEnv("STORYBLOK_ACCESS_TOKEN")))
    }
}

/// Split a slug into path segments. Leading and trailing slashes are ignored;
/// empty slugs and `.`/`..` segments are rejected.
fn slug_segments(slug: &str) -> Result<Vec<&str>, ContentError> {
    let trimmed = slug.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, TransportError};
    use crate::test_helpers::{ScriptedTransport, home_story_json, ok_json, status};
    use std::time::Duration;

    fn client(transport: Arc<ScriptedTransport>, token: Option<&str>) -> ContentClient {
        ContentClient::new(
            transport,
            &ContentConfig::default(),
            token.map(str::to_string),
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::ZERO,
                max_delay: Duration::ZERO,
            },
        )
        .unwrap()
    }

    fn story_ok() -> Result<HttpResponse, TransportError> {
        ok_json(&home_story_json())
    }

    // =========================================================================
    // URL building
    // =========================================================================

    #[test]
    fn published_url_has_no_cache_buster() {
        let c = client(ScriptedTransport::new(vec![]), Some("tok"));
        let url = c.story_url("home", Version::Published).unwrap();
        assert_eq!(url.host_str(), Some("api.storyblok.com"));
        assert_eq!(url.path(), "/v2/cdn/stories/home");
        assert!(url.query_pairs().any(|(k, v)| k == "token" && v == "tok"));
        assert!(url.query_pairs().any(|(k, v)| k == "version" && v == "published"));
        assert!(!url.query_pairs().any(|(k, _)| k == "cv"));
    }

    #[test]
    fn draft_cache_buster_increases() {
        let c = client(ScriptedTransport::new(vec![]), Some("tok"));
        let cv = |url: Url| -> u64 {
            url.query_pairs()
                .find(|(k, _)| k == "cv")
                .map(|(_, v)| v.parse().unwrap())
                .unwrap()
        };
        let first = cv(c.story_url("home", Version::Draft).unwrap());
        let second = cv(c.story_url("home", Version::Draft).unwrap());
        assert!(second > first);
    }

    #[test]
    fn nested_slug_keeps_segments() {
        let c = client(ScriptedTransport::new(vec![]), Some("tok"));
        let url = c.story_url("/venues/the barn/", Version::Published).unwrap();
        assert_eq!(url.path(), "/v2/cdn/stories/venues/the%20barn");
    }

    #[test]
    fn region_selects_host() {
        let content = ContentConfig {
            region: "us".into(),
            ..ContentConfig::default()
        };
        let c = ContentClient::new(
            ScriptedTransport::new(vec![]),
            &content,
            Some("t".into()),
            RetryPolicy::default(),
        )
        .unwrap();
        let url = c.story_url("home", Version::Published).unwrap();
        assert_eq!(url.host_str(), Some("api-us.storyblok.com"));
    }

    #[test]
    fn rejects_bad_slugs() {
        let c = client(ScriptedTransport::new(vec![]), Some("tok"));
        for slug in ["", "/", "  ", "a//b", "../secret"] {
            assert!(
                matches!(c.story_url(slug, Version::Published), Err(ContentError::InvalidSlug(_))),
                "{slug:?} should be rejected"
            );
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    #[test]
    fn missing_token_fails_before_io() {
        let transport = ScriptedTransport::new(vec![story_ok()]);
        let c = client(transport.clone(), None);
        let err = c.fetch_story("home", Version::Published).unwrap_err();
        assert!(matches!(
            err,
            ContentError::Config(ConfigError::MissingEnv("STORYBLOK_ACCESS_TOKEN"))
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn fetch_sends_no_store_and_bearer() {
        let transport = ScriptedTransport::new(vec![story_ok()]);
        let c = client(transport.clone(), Some("tok"));
        let story = c.fetch_story("home", Version::Published).unwrap();
        assert_eq!(story.slug, "home");
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header_value("cache-control"), Some("no-store"));
        assert_eq!(requests[0].header_value("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn non_success_is_upstream_error_with_body() {
        let c = client(ScriptedTransport::new(vec![status(401)]), Some("tok"));
        match c.fetch_story("home", Version::Published).unwrap_err() {
            ContentError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "status 401");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let c = client(
            ScriptedTransport::new(vec![Ok(HttpResponse {
                status: 200,
                body: b"<html>".to_vec(),
            })]),
            Some("tok"),
        );
        assert!(matches!(
            c.fetch_story("home", Version::Published),
            Err(ContentError::Json(_))
        ));
    }

    // =========================================================================
    // Retry
    // =========================================================================

    #[test]
    fn retry_recovers_on_third_attempt() {
        let transport = ScriptedTransport::new(vec![status(500), status(500), story_ok()]);
        let c = client(transport.clone(), Some("tok"));
        let story = c.fetch_story_with_retry("home", Version::Published).unwrap();
        assert_eq!(story.slug, "home");
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn retry_gives_up_immediately_on_404() {
        let transport = ScriptedTransport::new(vec![status(404), story_ok()]);
        let c = client(transport.clone(), Some("tok"));
        let err = c.fetch_story_with_retry("home", Version::Published).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn retry_covers_network_errors_and_429() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError("connection reset".into())),
            status(429),
            story_ok(),
        ]);
        let c = client(transport.clone(), Some("tok"));
        assert!(c.fetch_story_with_retry("home", Version::Published).is_ok());
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn version_parses() {
        assert_eq!("draft".parse::<Version>(), Ok(Version::Draft));
        assert!("latest".parse::<Version>().is_err());
    }
}
