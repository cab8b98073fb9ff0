//! Telegram Bot API provider.
//!
//! The Bot API has no "get message" call, so a post is inspected by
//! forwarding it into an inspection chat the bot can write to and reading the
//! forwarded copy. The chosen image's `file_id` is the stable reference;
//! `getFile` turns it into a download path valid for about an hour.

use std::time::Duration;

use anemone_core::ContentId;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{AssetProvider, InspectedContent, ProviderError, SetupError, TelegramConfig};

/// Wait assumed when a 429 carries no `retry_after`.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    forward_date: Option<i64>,
    #[serde(default)]
    forward_origin: Option<ForwardOrigin>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    photo: Vec<PhotoSize>,
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct ForwardOrigin {
    date: i64,
}

#[derive(Debug, Deserialize)]
struct PhotoSize {
    file_id: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct Document {
    file_id: String,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct File {
    #[serde(default)]
    file_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ForwardRequest<'a> {
    chat_id: i64,
    from_chat_id: &'a str,
    message_id: ContentId,
    disable_notification: bool,
}

/// How an API reply should be treated.
#[derive(Debug)]
enum Reply<T> {
    Ok(T),
    /// The message or file does not exist (any more).
    Missing,
    /// The bot lost access to the source chat.
    Denied,
}

fn interpret<T>(status: u16, envelope: ApiEnvelope<T>) -> Result<Reply<T>, ProviderError> {
    if envelope.ok {
        return Ok(envelope
            .result
            .map(Reply::Ok)
            .unwrap_or(Reply::Missing));
    }

    let code = envelope.error_code.unwrap_or(status);
    let description = envelope.description.unwrap_or_default();
    let lowered = description.to_ascii_lowercase();

    if code == 429 {
        let retry_after = envelope
            .parameters
            .and_then(|p| p.retry_after)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RETRY_AFTER);
        return Err(ProviderError::RateLimited { retry_after });
    }
    if code == 403
        || lowered.contains("chat not found")
        || lowered.contains("bot was kicked")
        || lowered.contains("not enough rights")
    {
        return Ok(Reply::Denied);
    }
    if code >= 500 {
        return Err(ProviderError::Transient(format!("{code}: {description}")));
    }
    // Remaining 4xx: deleted message, service message, invalid file id.
    Ok(Reply::Missing)
}

fn inspect(message: Message) -> InspectedContent {
    let timestamp = message
        .forward_origin
        .map(|origin| origin.date)
        .or(message.forward_date)
        .or(message.date);

    let mut content = InspectedContent {
        accessible: true,
        caption: message.caption,
        timestamp,
        ..InspectedContent::default()
    };

    if let Some(largest) = message
        .photo
        .into_iter()
        .max_by_key(|size| u64::from(size.width) * u64::from(size.height))
    {
        content.stable_reference = Some(largest.file_id);
        content.width = Some(largest.width);
        content.height = Some(largest.height);
    } else if let Some(document) = message.document.filter(|doc| {
        doc.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }) {
        content.stable_reference = Some(document.file_id);
    }
    content
}

/// Public link for a post, when the collection is addressable.
///
/// `@name` maps to `t.me/name/id`; `-100…` supergroup and channel ids map to
/// the private `t.me/c/…/id` form.
pub fn canonical_post_link(collection: &str, content_id: ContentId) -> Option<String> {
    if let Some(username) = collection.strip_prefix('@') {
        return (!username.is_empty()).then(|| format!("https://t.me/{username}/{content_id}"));
    }
    let internal = collection.strip_prefix("-100")?;
    (!internal.is_empty() && internal.bytes().all(|b| b.is_ascii_digit()))
        .then(|| format!("https://t.me/c/{internal}/{content_id}"))
}

/// [`AssetProvider`] backed by the Telegram Bot API.
pub struct TelegramProvider {
    client: reqwest::Client,
    api_base: String,
    token: String,
    inspection_chat_id: i64,
}

impl std::fmt::Debug for TelegramProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramProvider")
            .field("api_base", &self.api_base)
            .field("inspection_chat_id", &self.inspection_chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramProvider {
    /// Build a provider; `timeout` bounds each HTTP request.
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self, SetupError> {
        let token = config.token.clone().ok_or(SetupError::MissingToken)?;
        let inspection_chat_id = config
            .inspection_chat_id
            .ok_or(SetupError::MissingInspectionChat)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
            inspection_chat_id,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn read_reply<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<Reply<T>, ProviderError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body).map_err(|err| {
            ProviderError::Transient(format!("malformed {method} reply ({status}): {err}"))
        })?;
        interpret(status, envelope)
    }
}

#[async_trait]
impl AssetProvider for TelegramProvider {
    #[instrument(skip(self))]
    async fn forward_and_inspect(
        &self,
        collection: &str,
        content_id: ContentId,
    ) -> Result<InspectedContent, ProviderError> {
        let request = ForwardRequest {
            chat_id: self.inspection_chat_id,
            from_chat_id: collection,
            message_id: content_id,
            disable_notification: true,
        };
        let response = self
            .client
            .post(self.method_url("forwardMessage"))
            .json(&request)
            .send()
            .await?;
        match Self::read_reply::<Message>("forwardMessage", response).await? {
            Reply::Ok(message) => Ok(inspect(message)),
            Reply::Missing => {
                debug!("message to forward not found");
                Ok(InspectedContent::without_asset())
            }
            Reply::Denied => Ok(InspectedContent::inaccessible()),
        }
    }

    #[instrument(skip_all)]
    async fn materialize_url(
        &self,
        stable_reference: &str,
    ) -> Result<Option<String>, ProviderError> {
        let response = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", stable_reference)])
            .send()
            .await?;
        match Self::read_reply::<File>("getFile", response).await? {
            Reply::Ok(File {
                file_path: Some(path),
            }) => Ok(Some(format!(
                "{}/file/bot{}/{}",
                self.api_base, self.token, path
            ))),
            _ => Ok(None),
        }
    }

    fn canonical_link(&self, collection: &str, content_id: ContentId) -> Option<String> {
        canonical_post_link(collection, content_id)
    }
}
