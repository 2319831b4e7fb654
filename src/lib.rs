//! # Rose Ridge
//!
//! The marketing site for the Rose Ridge wedding venue. Content lives in a
//! headless CMS (Storyblok); this crate fetches one story per request and
//! renders it to HTML on the server.
//!
//! # Request Flow
//!
//! ```text
//! GET /pricing
//!   → content client     fetch story "pricing" (draft or published, retried)
//!   → story decoding     JSON → Story { blocks: Vec<ContentBlock> }
//!   → registry           component name → section renderer (clean or editor table)
//!   → sections           Maud markup per block
//!   → render             full document, status pages
//!   → theme middleware   cookie preferences → <html data-theme data-brand>
//! ```
//!
//! Every step after the fetch is a pure function of its input, so the whole
//! chain is testable with a fixture story and a scripted transport; the
//! router never needs a socket.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging, environment secrets, CSS tokens |
//! | [`http`] | Outbound HTTP behind the [`http::Transport`] trait |
//! | [`content`] | Delivery API client, retry, typed stories/blocks/assets, Management API publish |
//! | [`sections`] | Section primitives and one renderer per block kind |
//! | [`registry`] | Component name → renderer tables, selected by request path |
//! | [`render`] | Page documents, status pages, the generated stylesheet |
//! | [`theme`] | Light/dark and brand preferences, cookie parsing, root-attribute injection |
//! | [`bridge`] | Visual-editor bridge: preview detection, poll budget and live-update planning |
//! | [`webhook`] | Signed publish webhook → build hook |
//! | [`server`] | `tiny_http` listener, rayon pool, application context, routes |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typed Blocks at the Boundary
//!
//! Content JSON is decoded once, when the story arrives. Blocks become a
//! closed [`content::Block`] enum with an `Unknown` variant that keeps the raw
//! JSON, and asset fields accept both the object and the bare-string shape
//! the CMS produces. Renderers never look at `serde_json::Value`.
//!
//! ## Two Registry Tables
//!
//! Pages under `/editor` render through a table that also lists legacy
//! component aliases and treats an unknown component as an error, so editors
//! see broken content immediately. Public pages use the canonical names only
//! and render a hidden placeholder for anything unknown.
//!
//! ## One Application Context
//!
//! Settings, secrets, the content client and the stylesheet are built once
//! into [`server::App`] and shared by `Arc`. There is no global state and no
//! lazy SDK initialization.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a build error and all interpolation is auto-escaped, which matters here
//! because every string on the page is CMS content.

pub mod bridge;
pub mod config;
pub mod content;
pub mod http;
pub mod output;
pub mod registry;
pub mod render;
pub mod sections;
pub mod server;
pub mod theme;
pub mod webhook;

#[cfg(test)]
pub(crate) mod test_helpers;
