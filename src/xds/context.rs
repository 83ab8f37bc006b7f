//! Caller-supplied context for one translation pass.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context handed through to extractors unchanged.
///
/// The matching layer never waits on or checks the cancellation token itself;
/// it only makes the token available to extractors that do blocking lookups.
#[derive(Debug, Clone)]
pub struct TranslationContext {
    translation_id: Uuid,
    proxy: Option<String>,
    cancellation: CancellationToken,
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationContext {
    pub fn new() -> Self {
        Self { translation_id: Uuid::new_v4(), proxy: None, cancellation: CancellationToken::new() }
    }

    /// Use a token owned by the caller (e.g. the snapshot build's)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Name of the proxy whose configuration is being built, for log correlation
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn translation_id(&self) -> Uuid {
        self.translation_id
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
