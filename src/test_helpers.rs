//! Shared test utilities for the roseridge test suite.
//!
//! Provides fixture stories, block contexts for section renderers, and a
//! scripted [`Transport`] that replays canned responses and records every
//! request it was sent.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let transport = ScriptedTransport::new(vec![ok_json(&home_story_json())]);
//! // ... hand `transport.clone()` to a client, then:
//! assert_eq!(transport.requests().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::content::Story;
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::sections::BlockContext;

// =========================================================================
// Fixtures
// =========================================================================

/// `fixtures/stories/home.json`: a CDN response for the home page.
pub fn home_story_json() -> String {
    include_str!("../fixtures/stories/home.json").to_string()
}

/// The decoded home story.
pub fn home_story() -> Story {
    Story::from_response(home_story_json().as_bytes()).unwrap()
}

/// Context for rendering a block outside the editor.
pub fn block_context(uid: &'static str, component: &'static str) -> BlockContext<'static> {
    BlockContext {
        uid,
        component,
        editable: None,
        editor: false,
    }
}

// =========================================================================
// Scripted transport
// =========================================================================

/// A [`Transport`] that answers from a fixed script, in order.
///
/// Once the script is exhausted every further request fails with a
/// transport error, which keeps an unexpected extra request visible.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("script exhausted".into())))
    }
}

/// A 200 response with a JSON body.
pub fn ok_json(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status: 200,
        body: body.as_bytes().to_vec(),
    })
}

/// A response with the given status and a short text body.
pub fn status(code: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status: code,
        body: format!("status {code}").into_bytes(),
    })
}
