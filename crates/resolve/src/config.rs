//! Resolver and provider configuration.

use std::collections::BTreeSet;
use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ProxyMode, RetryPolicy};

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the inspection chat id.
pub const INSPECTION_CHAT_ENV: &str = "LOG_CHAT_ID";

/// Tunables of the resolution cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Freshness window of volatile cache entries, seconds.
    pub fresh_ttl_secs: u64,
    /// Upper bound on cached entries.
    pub cache_capacity: usize,
    /// Total upstream attempts per resolve.
    pub max_attempts: u32,
    /// Longest rate-limit wait honoured, seconds.
    pub max_suggested_wait_secs: u64,
    /// First transient-failure backoff, milliseconds.
    pub backoff_base_ms: u64,
    /// Per-call upstream timeout, seconds.
    pub call_timeout_secs: u64,
    /// Lower bound of the pre-call jitter, milliseconds.
    pub jitter_min_ms: u64,
    /// Upper bound (exclusive) of the pre-call jitter, milliseconds.
    pub jitter_max_ms: u64,
    /// Collections eligible for the persistent override path.
    pub persistent_collections: BTreeSet<String>,
    /// How temporary URLs are exposed.
    pub proxy: ProxyMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fresh_ttl_secs: 3300,
            cache_capacity: 4096,
            max_attempts: 3,
            max_suggested_wait_secs: 5,
            backoff_base_ms: 500,
            call_timeout_secs: 12,
            jitter_min_ms: 50,
            jitter_max_ms: 250,
            persistent_collections: BTreeSet::new(),
            proxy: ProxyMode::default(),
        }
    }
}

impl ResolverConfig {
    /// Freshness window.
    pub fn fresh_ttl(&self) -> Duration {
        Duration::from_secs(self.fresh_ttl_secs)
    }

    /// Per-call timeout.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Jitter window; empty when jitter is disabled.
    pub fn jitter(&self) -> Range<Duration> {
        Duration::from_millis(self.jitter_min_ms)..Duration::from_millis(self.jitter_max_ms)
    }

    /// Retry schedule.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            max_suggested_wait: Duration::from_secs(self.max_suggested_wait_secs),
            backoff_base: Duration::from_millis(self.backoff_base_ms),
        }
    }

    /// Whether `collection` goes through the persistent override store first.
    pub fn uses_persistent_store(&self, collection: &str) -> bool {
        self.persistent_collections.contains(collection)
    }
}

/// Telegram Bot API settings.
///
/// The token is never read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// API root.
    pub api_base: String,
    /// Chat messages are forwarded into for inspection.
    pub inspection_chat_id: Option<i64>,
    /// Bot token, filled from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            inspection_chat_id: None,
            token: None,
        }
    }
}

impl TelegramConfig {
    /// Apply token and inspection chat from the environment.
    pub fn with_env(mut self) -> Self {
        self.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        if let Some(chat) = std::env::var(INSPECTION_CHAT_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
        {
            self.inspection_chat_id = Some(chat);
        }
        self
    }
}
