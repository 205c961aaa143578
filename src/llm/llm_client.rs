use crate::config::{DemoMode, LlmConfig};
use crate::llm::demo::demo_reply;
use crate::llm::providers::{LlmProvider, OpenAiCompatibleProvider};
use crate::llm::{ChatMessage, UpstreamError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Decides when the client serves canned replies instead of upstream output.
///
/// One policy for every call site:
/// * `DemoMode::Always` serves canned replies without calling the provider.
/// * an authentication failure (or a missing credential) engages degraded
///   mode for the rest of the process lifetime, whatever the mode.
/// * any other upstream error is absorbed only under `DemoMode::OnError`.
#[derive(Debug)]
pub struct DegradedPolicy {
    mode: DemoMode,
    engaged: AtomicBool,
}

impl DegradedPolicy {
    pub fn new(mode: DemoMode) -> Self {
        DegradedPolicy {
            mode,
            engaged: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> DemoMode {
        self.mode
    }

    /// True when calls should skip the provider entirely.
    pub fn is_engaged(&self) -> bool {
        self.mode == DemoMode::Always || self.engaged.load(Ordering::SeqCst)
    }

    /// Engages degraded mode. Logs only on the first engagement.
    pub fn engage(&self, reason: &str) {
        if !self.engaged.swap(true, Ordering::SeqCst) {
            warn!("Switching to demo mode: {}", reason);
        }
    }

    /// Returns true if `err` should be answered with a canned reply.
    pub fn absorbs(&self, err: &UpstreamError) -> bool {
        if err.is_auth() {
            self.engage(&err.to_string());
            return true;
        }
        self.mode == DemoMode::OnError
    }
}

/// Completion client: sends instructions to the configured provider and
/// returns raw text, applying the degraded-mode policy.
#[derive(Debug)]
pub struct CompletionClient {
    provider: Box<dyn LlmProvider>,
    policy: DegradedPolicy,
}

impl CompletionClient {
    /// Creates a client for the provider named in the config.
    ///
    /// # Returns
    /// * `Result<CompletionClient, crate::errors::Error>` - client or configuration error
    pub fn new(config: &LlmConfig) -> Result<Self, crate::errors::Error> {
        let provider = OpenAiCompatibleProvider::from_config(config)?;
        info!(
            "Completion provider {:?} ready (model: {}, demo mode: {:?})",
            config.provider, config.model, config.demo_mode
        );
        Ok(Self::with_provider(Box::new(provider), config.demo_mode))
    }

    /// Wraps an already constructed provider.
    pub fn with_provider(provider: Box<dyn LlmProvider>, mode: DemoMode) -> Self {
        let policy = DegradedPolicy::new(mode);
        if !provider.has_credential() {
            policy.engage("no credential configured for the completion provider");
        }
        CompletionClient { provider, policy }
    }

    pub fn is_degraded(&self) -> bool {
        self.policy.is_engaged()
    }

    pub fn policy(&self) -> &DegradedPolicy {
        &self.policy
    }

    /// Calls the provider with the ordered instruction turns.
    ///
    /// # Returns
    /// * `Result<String, UpstreamError>` - reply text (real or canned) or the upstream failure
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, UpstreamError> {
        if self.policy.is_engaged() {
            debug!("demo mode engaged, serving canned reply");
            return Ok(demo_reply(&messages));
        }

        match self.provider.call_llm_api(messages.clone()).await {
            Ok(response) => {
                debug!("LLM response: {}", response);
                Ok(response)
            }
            Err(err) if self.policy.absorbs(&err) => {
                warn!("Upstream error ({}), serving canned reply: {}", err.kind(), err);
                Ok(demo_reply(&messages))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[derive(Debug)]
    struct FailingProvider {
        calls: Arc<AtomicUsize>,
        error: fn() -> UpstreamError,
    }

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn call_llm_api(&self, _messages: Vec<ChatMessage>) -> Result<String, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }
    }

    #[derive(Debug)]
    struct NoKeyProvider;

    #[async_trait]
    impl LlmProvider for NoKeyProvider {
        async fn call_llm_api(&self, _messages: Vec<ChatMessage>) -> Result<String, UpstreamError> {
            panic!("provider without credential must not be called");
        }

        fn has_credential(&self) -> bool {
            false
        }
    }

    fn legal_turns() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You are a lawyer"),
            ChatMessage::user("Analyze this contract"),
        ]
    }

    #[tokio::test]
    async fn test_auth_failure_engages_demo_mode_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = CompletionClient::with_provider(
            Box::new(FailingProvider {
                calls: calls.clone(),
                error: || UpstreamError::Auth("expired".into()),
            }),
            DemoMode::Off,
        );

        let first = client.complete(legal_turns()).await.unwrap();
        assert!(first.contains("risks"));
        assert!(client.is_degraded());

        client.complete(legal_turns()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_propagates_when_demo_off() {
        let client = CompletionClient::with_provider(
            Box::new(FailingProvider {
                calls: Arc::new(AtomicUsize::new(0)),
                error: || UpstreamError::RateLimited("429".into()),
            }),
            DemoMode::Off,
        );
        let err = client.complete(legal_turns()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::RateLimited(_)));
        assert!(!client.is_degraded());
    }

    #[tokio::test]
    async fn test_on_error_mode_absorbs_without_engaging() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = CompletionClient::with_provider(
            Box::new(FailingProvider {
                calls: calls.clone(),
                error: || UpstreamError::Connection("refused".into()),
            }),
            DemoMode::OnError,
        );
        assert!(client.complete(legal_turns()).await.is_ok());
        assert!(client.complete(legal_turns()).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!client.is_degraded());
    }

    #[tokio::test]
    async fn test_missing_credential_serves_canned() {
        let client = CompletionClient::with_provider(Box::new(NoKeyProvider), DemoMode::Off);
        assert!(client.is_degraded());
        let reply = client.complete(legal_turns()).await.unwrap();
        assert!(reply.contains("summary"));
    }

    #[tokio::test]
    async fn test_always_mode_skips_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = CompletionClient::with_provider(
            Box::new(FailingProvider {
                calls: calls.clone(),
                error: || UpstreamError::Connection("unused".into()),
            }),
            DemoMode::Always,
        );
        client.complete(legal_turns()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
