//! Content layer: the CMS delivery API and the documents it returns.
//!
//! - [`client`] builds story URLs and performs the fetch through a
//!   [`crate::http::Transport`].
//! - [`retry`] wraps a fetch in bounded exponential backoff.
//! - [`story`] and [`asset`] decode the JSON into typed values once, at the
//!   boundary. Nothing past this module sees raw content JSON except
//!   [`Block::Unknown`].
//! - [`management`] publishes stories through the Management API.

pub mod asset;
pub mod client;
pub mod management;
pub mod retry;
pub mod story;

pub use asset::{Asset, Link};
pub use client::{ContentClient, Version};
pub use retry::{RetryPolicy, Retryable};
pub use story::{Block, BlockKind, ContentBlock, PageMeta, Story};

use crate::config::ConfigError;
use crate::http::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid slug {0:?}")]
    InvalidSlug(String),
    #[error("content API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("content API unreachable: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid JSON from content API: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid block{}: {reason}", describe_component(.component))]
    InvalidBlock {
        component: Option<String>,
        reason: String,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn describe_component(component: &Option<String>) -> String {
    component
        .as_deref()
        .map(|c| format!(" `{c}`"))
        .unwrap_or_default()
}

impl ContentError {
    /// The CMS answered 404 for the requested story.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::Upstream { status: 404, .. })
    }
}

impl Retryable for ContentError {
    fn is_retryable(&self) -> bool {
        match self {
            ContentError::Transport(_) => true,
            ContentError::Upstream { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16) -> ContentError {
        ContentError::Upstream {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn retryable_classification() {
        assert!(upstream(500).is_retryable());
        assert!(upstream(503).is_retryable());
        assert!(upstream(429).is_retryable());
        assert!(ContentError::Transport(TransportError("reset".into())).is_retryable());
        assert!(!upstream(404).is_retryable());
        assert!(!upstream(401).is_retryable());
        assert!(!ContentError::InvalidSlug(String::new()).is_retryable());
    }

    #[test]
    fn invalid_block_message_names_component() {
        let err = ContentError::InvalidBlock {
            component: Some("hero".into()),
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "invalid block `hero`: bad");
        let err = ContentError::InvalidBlock {
            component: None,
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "invalid block: bad");
    }
}
