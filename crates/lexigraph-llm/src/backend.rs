//! Completion backend trait and the scripted test backend.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{LlmError, Result};
use crate::types::CompletionRequest;

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// Backend that replays scripted replies in order and records requests.
///
/// Running out of replies is an error, like a provider outage.
pub struct MockBackend {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Backend answering every call from the given texts, in order.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Backend whose single call fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(LlmError::Backend(message.into()))])
    }

    /// All requests made so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Backend("MockBackend: no more replies".into())))
    }
}
