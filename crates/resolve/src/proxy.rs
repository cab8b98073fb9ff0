//! Rewriting temporary upstream URLs through a CORS-capable relay.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// How temporary URLs are exposed to browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProxyMode {
    /// Public image CDN relay that fetches, resizes and serves with CORS.
    ///
    /// The relay operator receives the full upstream URL. For Telegram
    /// that URL embeds the bot token; use [`ProxyMode::Relay`] when the
    /// token must stay in-house.
    Wsrv {
        /// Relay endpoint.
        base: String,
        /// Target width in pixels; 0 keeps the original size.
        width: u32,
    },
    /// The gallery's own proxy endpoint taking a `url` parameter.
    Relay {
        /// Endpoint URL, e.g. `https://gallery.example/api/proxy_image`.
        base: String,
    },
    /// Hand the upstream URL out unchanged.
    Direct,
}

impl Default for ProxyMode {
    fn default() -> Self {
        ProxyMode::Wsrv {
            base: "https://wsrv.nl/".to_string(),
            width: 500,
        }
    }
}

impl ProxyMode {
    /// Wrap `target` for this mode.
    ///
    /// A relay base that is not a valid URL leaves `target` untouched.
    pub fn wrap(&self, target: &str) -> String {
        match self {
            ProxyMode::Direct => target.to_string(),
            ProxyMode::Relay { base } => with_params(base, &[("url", target)], target),
            ProxyMode::Wsrv { base, width } => {
                if *width == 0 {
                    with_params(base, &[("url", target)], target)
                } else {
                    let width = width.to_string();
                    with_params(base, &[("url", target), ("w", width.as_str())], target)
                }
            }
        }
    }
}

fn with_params(base: &str, params: &[(&str, &str)], fallback: &str) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.into(),
        Err(err) => {
            tracing::warn!(%base, %err, "invalid proxy base, serving upstream url");
            fallback.to_string()
        }
    }
}
