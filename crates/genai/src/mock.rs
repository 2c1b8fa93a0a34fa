//! Scripted generator for testing.

use crate::error::{ErrorKind, Result};
use crate::{GenerationRequest, Generator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// What the [`MockGenerator`] answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Successful generation with this text.
    Text(String),
    /// Fails with [`ErrorKind::Rejected`] carrying this message.
    Reject(String),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self::Reject(message.into())
    }
}

/// Scripted [`Generator`] for testing.
///
/// Answers with the scripted replies in order, then with the fallback reply
/// forever. Every request is counted and recorded.
///
/// # Examples
///
/// ```
/// use verbum_genai::{GenerationRequest, Generator, MockGenerator, Reply};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let generator = MockGenerator::scripted([Reply::reject("429 RESOURCE_EXHAUSTED")], Reply::text("Amém."));
/// let request = GenerationRequest::new("model", "Oração para: paz");
/// assert!(generator.generate(&request).await.is_err());
/// assert_eq!(generator.generate(&request).await.unwrap(), "Amém.");
/// assert_eq!(generator.calls(), 2);
/// # }
/// ```
pub struct MockGenerator {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    latency: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    /// Answer every request with `replies` in order, then with `then`.
    pub fn scripted(replies: impl IntoIterator<Item = Reply>, then: Reply) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            fallback: then,
            latency: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always succeed with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::scripted([], Reply::text(text))
    }

    /// Always fail with a rejection carrying `message`.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::scripted([], Reply::reject(message))
    }

    /// Sleep this long before answering each request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());
        let reply = self.script.lock().await.pop_front().unwrap_or_else(|| self.fallback.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Reject(message) => exn::bail!(ErrorKind::Rejected(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replying() {
        let generator = MockGenerator::replying("texto");
        let request = GenerationRequest::new("m", "a");
        assert_eq!(generator.generate(&request).await.unwrap(), "texto");
        assert_eq!(generator.generate(&request).await.unwrap(), "texto");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejecting() {
        let generator = MockGenerator::rejecting("429 Too Many Requests");
        let err = generator.generate(&GenerationRequest::new("m", "a")).await.unwrap_err();
        assert_eq!(&*err, &ErrorKind::Rejected("429 Too Many Requests".to_string()));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_records_requests() {
        let generator = MockGenerator::replying("ok");
        generator.generate(&GenerationRequest::new("first", "1")).await.unwrap();
        generator.generate(&GenerationRequest::new("second", "2")).await.unwrap();
        let models: Vec<_> = generator.requests().await.into_iter().map(|r| r.model).collect();
        assert_eq!(models, ["first", "second"]);
    }
}
