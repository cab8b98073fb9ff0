//! Resolved assets and the shapes returned to callers.

use anemone_core::ContentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Renderable image for one content identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    /// Proxied, directly renderable URL.
    pub url: String,
    /// Pixel width, when upstream reported it.
    pub width: Option<u32>,
    /// Pixel height, when upstream reported it.
    pub height: Option<u32>,
    /// Caption attached to the content.
    pub caption: Option<String>,
    /// Publication date, `YYYY-MM-DD`.
    pub display_date: Option<String>,
    /// Permanent link to the content at its source.
    pub canonical_link: Option<String>,
    /// When this asset was produced.
    pub cached_at: DateTime<Utc>,
}

/// Outcome of resolving one identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A renderable asset.
    Found(ResolvedAsset),
    /// No usable asset: missing content, no image, or upstream kept failing.
    NotFound,
    /// The source collection is no longer reachable. Terminal; not retried.
    AccessDenied,
}

impl Resolution {
    /// The asset, if any.
    pub fn asset(&self) -> Option<&ResolvedAsset> {
        match self {
            Resolution::Found(asset) => Some(asset),
            _ => None,
        }
    }
}

/// Placeholder image for identifiers with no resolvable asset.
///
/// The placeholder host serves permissive CORS headers, so clients can render
/// it like any proxied asset.
pub fn placeholder_url(content_id: ContentId) -> String {
    format!("https://picsum.photos/seed/{content_id}/400/600")
}

/// Render a unix timestamp as a `YYYY-MM-DD` UTC date.
pub fn display_date(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|at| at.format("%Y-%m-%d").to_string())
}

/// Why a resolve query produced no asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveFailure {
    /// See [`Resolution::NotFound`].
    NotFound,
    /// See [`Resolution::AccessDenied`].
    AccessDenied,
}

/// Resolve query response in the gallery client's shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveResponse {
    /// Whether `url` points at the real asset rather than a placeholder.
    pub found: bool,
    /// Asset or placeholder URL.
    pub url: String,
    /// Pixel width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Caption text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Permanent source link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Failure reason when `found` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolveFailure>,
}

impl ResolveResponse {
    /// Build the response for `content_id` from a resolution outcome.
    pub fn from_resolution(content_id: ContentId, resolution: Resolution) -> Self {
        let failure = |error| Self {
            found: false,
            url: placeholder_url(content_id),
            width: None,
            height: None,
            caption: None,
            date: None,
            link: None,
            error: Some(error),
        };
        match resolution {
            Resolution::Found(asset) => Self {
                found: true,
                url: asset.url,
                width: asset.width,
                height: asset.height,
                caption: asset.caption,
                date: asset.display_date,
                link: asset.canonical_link,
                error: None,
            },
            Resolution::NotFound => failure(ResolveFailure::NotFound),
            Resolution::AccessDenied => failure(ResolveFailure::AccessDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_response_uses_placeholder() {
        let response = ResolveResponse::from_resolution(42, Resolution::NotFound);
        assert!(!response.found);
        assert_eq!(response.url, "https://picsum.photos/seed/42/400/600");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "not_found");
        assert!(json.get("caption").is_none());
    }

    #[test]
    fn display_date_is_utc_day() {
        assert_eq!(display_date(1_709_251_200).as_deref(), Some("2024-03-01"));
        assert_eq!(display_date(i64::MAX), None);
    }

    #[test]
    fn access_denied_is_distinct() {
        let response = ResolveResponse::from_resolution(7, Resolution::AccessDenied);
        assert_eq!(response.error, Some(ResolveFailure::AccessDenied));
    }

    #[test]
    fn found_response_carries_asset_fields() {
        let asset = ResolvedAsset {
            url: "https://cdn.example/a.jpg".into(),
            width: Some(1280),
            height: Some(960),
            caption: Some("dusk".into()),
            display_date: Some("2024-03-01".into()),
            canonical_link: Some("https://t.me/anemonn/7".into()),
            cached_at: Utc::now(),
        };
        let response = ResolveResponse::from_resolution(7, Resolution::Found(asset));
        assert!(response.found);
        assert_eq!(response.width, Some(1280));
        assert_eq!(response.link.as_deref(), Some("https://t.me/anemonn/7"));
        assert_eq!(response.error, None);
    }
}
