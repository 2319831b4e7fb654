//! Request routing.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/api/health` | [`health`] |
//! | POST | `/api/revalidate` | CMS webhook, triggers the build hook |
//! | POST | `/api/preview/event` | visual-editor update planner |
//! | POST | `/api/preferences` | theme/brand cookies |
//! | GET | `/assets/style.css` | generated stylesheet |
//! | GET | `/`, `/{slug...}` | story page, clean registry |
//! | GET | `/editor`, `/editor/{slug...}` | story page, editor registry |
//!
//! Every response then passes through the theme middleware, which writes the
//! `rr.theme`/`rr.brand` cookie values onto the `<html>` tag of HTML pages.

use super::App;
use super::response::{AppRequest, AppResponse, Method, mime};
use crate::bridge::{self, PreviewEventRequest};
use crate::content::{ContentError, Story, Version};
use crate::registry::{RegistryKind, RenderContext};
use crate::render::{self, Document};
use crate::theme::{self, Preferences, RootAttributes};
use crate::webhook::{self, SIGNATURE_HEADER};
use serde::Serialize;

/// Route one request and apply the theme middleware.
pub fn route(app: &App, request: &AppRequest) -> AppResponse {
    let response = dispatch(app, request);
    apply_theme(request, response)
}

fn dispatch(app: &App, request: &AppRequest) -> AppResponse {
    let path = request.path.as_str();
    match (request.method, path) {
        (m, "/api/health") if m.is_read() => AppResponse::json(200, &health(app)),
        (Method::Post, "/api/revalidate") => revalidate(app, request),
        (Method::Post, "/api/preview/event") => preview_event(request),
        (Method::Post, "/api/preferences") => preferences(request),
        (_, "/api/health") => method_not_allowed("GET, HEAD"),
        (_, "/api/revalidate" | "/api/preview/event" | "/api/preferences") => {
            method_not_allowed("POST")
        }
        (_, p) if p.starts_with("/api/") => {
            AppResponse::json(404, &serde_json::json!({"error": "not found"}))
        }
        (m, render::STYLESHEET_PATH) if m.is_read() => stylesheet(app, request),
        (_, p) if p.starts_with("/assets/") => AppResponse::text(404, "404 Not Found"),
        (m, _) if m.is_read() => page(app, request),
        _ => method_not_allowed("GET, HEAD"),
    }
}

fn method_not_allowed(allow: &str) -> AppResponse {
    AppResponse::text(405, "405 Method Not Allowed").with_header("Allow", allow)
}

// =============================================================================
// Theme middleware
// =============================================================================

/// Inject cookie preferences into HTML responses outside the excluded paths.
/// Such responses depend on the cookie whether or not one was sent, so they
/// all carry `Vary: Cookie`.
pub fn apply_theme(request: &AppRequest, response: AppResponse) -> AppResponse {
    if !theme::should_inject(&request.path, response.content_type()) {
        return response;
    }
    let mut response = response.with_header("Vary", "Cookie");
    let prefs = request
        .header("Cookie")
        .map(Preferences::from_cookie_header)
        .unwrap_or_default();
    if prefs.is_empty() {
        return response;
    }
    let mut root = RootAttributes::default();
    prefs.apply(&mut root);
    let document = response.body_text();
    response.body = theme::inject_root_attributes(&document, &root).into_bytes();
    response
}

// =============================================================================
// API
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub environment: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub content_token: bool,
    pub webhook_secret: bool,
    pub build_hook: bool,
}

/// Liveness plus which secrets are configured. Always 200; a missing
/// content token reports `degraded`.
pub fn health(app: &App) -> HealthReport {
    let checks = HealthChecks {
        content_token: app.secrets.access_token.is_some(),
        webhook_secret: app.secrets.webhook_secret.is_some(),
        build_hook: app.secrets.build_hook_url.is_some(),
    };
    HealthReport {
        status: if checks.content_token { "ok" } else { "degraded" },
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: app.uptime().as_secs_f64(),
        environment: app.config.environment.as_str(),
        checks,
    }
}

fn revalidate(app: &App, request: &AppRequest) -> AppResponse {
    let signature = request.header(SIGNATURE_HEADER);
    match webhook::handle_revalidate(app.transport.as_ref(), &app.secrets, &request.body, signature) {
        Ok(body) => AppResponse::json(200, &body),
        Err(err) => {
            let status = err.status();
            if status >= 500 {
                tracing::error!(error = %err, "revalidate failed");
            } else {
                tracing::warn!(error = %err, "revalidate rejected");
            }
            AppResponse::json(
                status,
                &serde_json::json!({"success": false, "error": err.to_string()}),
            )
        }
    }
}

fn preview_event(request: &AppRequest) -> AppResponse {
    match serde_json::from_slice::<PreviewEventRequest>(&request.body) {
        Ok(event) => AppResponse::json(200, &bridge::plan_update(&event.event, event.generation)),
        Err(err) => AppResponse::json(400, &serde_json::json!({"error": err.to_string()})),
    }
}

fn preferences(request: &AppRequest) -> AppResponse {
    let prefs = Preferences::from_form(&request.body);
    if prefs.is_empty() {
        return AppResponse::text(400, "expected theme=light|dark and/or brand=classic|garden");
    }
    prefs
        .set_cookies()
        .iter()
        .fold(AppResponse::empty(204), |response, cookie| {
            response.with_header("Set-Cookie", cookie)
        })
}

fn stylesheet(app: &App, request: &AppRequest) -> AppResponse {
    let etag = &app.stylesheet.etag;
    if request.header("If-None-Match") == Some(etag.as_str()) {
        return AppResponse::empty(304).with_header("ETag", etag);
    }
    AppResponse::new(200, mime::CSS, app.stylesheet.css.as_str())
        .with_header("ETag", etag)
        .with_header("Cache-Control", "public, max-age=3600")
}

// =============================================================================
// Pages
// =============================================================================

/// Map a request path to a story slug. `None` for paths no story can have.
pub fn page_slug<'a>(path: &'a str, home_slug: &'a str) -> Option<&'a str> {
    let rest = path
        .strip_prefix("/editor")
        .filter(|r| r.is_empty() || r.starts_with('/'))
        .unwrap_or(path);
    let slug = rest.trim_matches('/');
    if slug.is_empty() {
        return Some(home_slug);
    }
    let valid = slug
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'/'));
    (valid && !slug.contains("//")).then_some(slug)
}

fn page(app: &App, request: &AppRequest) -> AppResponse {
    let preview = bridge::is_preview_query(&request.query);
    let kind = RegistryKind::for_path(&request.path);
    let href = app.stylesheet.href();
    let doc = Document {
        site_name: &app.config.site.name,
        stylesheet_href: &href,
        preview,
    };

    let Some(slug) = page_slug(&request.path, &app.config.site.home_slug) else {
        return AppResponse::html(404, render::render_not_found(&doc, &request.path));
    };
    let version = if preview || app.config.content.preview {
        Version::Draft
    } else {
        Version::Published
    };

    match app.content.fetch_story_with_retry(slug, version) {
        Ok(story) => render_page(app, &story, kind, &doc, version),
        Err(err) => content_failure(app, &doc, &request.path, slug, err),
    }
}

fn render_page(
    app: &App,
    story: &Story,
    kind: RegistryKind,
    doc: &Document<'_>,
    version: Version,
) -> AppResponse {
    let ctx = RenderContext {
        kind,
        site_name: &app.config.site.name,
    };
    let cache_control = match version {
        Version::Draft => "no-store",
        Version::Published => "public, max-age=60",
    };
    match render::render_story(story, &ctx, doc) {
        Ok(markup) => AppResponse::html(200, markup).with_header("Cache-Control", cache_control),
        Err(err) => {
            tracing::error!(slug = %story.full_slug, registry = kind.as_str(), error = %err, "render failed");
            let show = !app.config.environment.is_production();
            AppResponse::html(500, render::render_error_boundary(doc, &err, show))
                .with_header("Cache-Control", "no-store")
        }
    }
}

fn content_failure(
    app: &App,
    doc: &Document<'_>,
    path: &str,
    slug: &str,
    err: ContentError,
) -> AppResponse {
    let response = match &err {
        ContentError::Upstream { status: 404, .. } | ContentError::InvalidSlug(_) => {
            tracing::debug!(slug, error = %err, "story not found");
            AppResponse::html(404, render::render_not_found(doc, path))
        }
        ContentError::Config(_) | ContentError::InvalidBlock { .. } => {
            tracing::error!(slug, error = %err, "cannot render page");
            let show = !app.config.environment.is_production();
            AppResponse::html(500, render::render_error_boundary(doc, &err, show))
        }
        _ => {
            tracing::warn!(slug, error = %err, "content API failure");
            AppResponse::html(502, render::render_upstream_error(doc))
        }
    };
    response.with_header("Cache-Control", "no-store")
}
