//! External resolution provider seam.

use anemone_core::ContentId;
use async_trait::async_trait;

use crate::ProviderError;

/// What inspecting one piece of content revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectedContent {
    /// False when the source collection can no longer be read.
    pub accessible: bool,
    /// Stable reference of the content's image, if it has one.
    pub stable_reference: Option<String>,
    /// Caption text.
    pub caption: Option<String>,
    /// Unix timestamp of the original publication.
    pub timestamp: Option<i64>,
    /// Pixel width of the chosen image.
    pub width: Option<u32>,
    /// Pixel height of the chosen image.
    pub height: Option<u32>,
}

impl InspectedContent {
    /// The source refused access.
    pub fn inaccessible() -> Self {
        Self::default()
    }

    /// Content exists but carries no usable image.
    pub fn without_asset() -> Self {
        Self {
            accessible: true,
            ..Self::default()
        }
    }
}

/// Rate-limited upstream that can turn content identifiers into image URLs.
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Read the content behind `content_id` in `collection`.
    async fn forward_and_inspect(
        &self,
        collection: &str,
        content_id: ContentId,
    ) -> Result<InspectedContent, ProviderError>;

    /// Exchange a stable reference for a temporary direct URL.
    ///
    /// `Ok(None)` means the reference has expired upstream.
    async fn materialize_url(&self, stable_reference: &str)
        -> Result<Option<String>, ProviderError>;

    /// Permanent public link to the content, when the collection has one.
    fn canonical_link(&self, _collection: &str, _content_id: ContentId) -> Option<String> {
        None
    }
}
