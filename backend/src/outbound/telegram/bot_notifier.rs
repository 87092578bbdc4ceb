//! Reqwest-backed `ModerationNotifier` for the Telegram Bot API.
//!
//! Text-only messages go through `sendMessage`. Photos and videos are
//! uploaded with `sendPhoto` or `sendVideo`, the message text becoming the
//! caption. Each delivery is a single attempt.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use super::dto::{InlineKeyboardMarkup, SendMessageRequest, escape_html};
use crate::config::TelegramSettings;
use crate::domain::ports::{ModerationNotifier, ModerationNotifierError};
use crate::domain::{MediaAttachment, MediaKind, ModerationMessage};
use crate::outbound::http_body::body_preview;

/// Delivers moderation messages to one chat.
pub struct TelegramNotifier {
    client: Client,
    settings: TelegramSettings,
}

impl TelegramNotifier {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: TelegramSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.settings.api_base,
            self.settings.bot_token.as_str()
        )
    }

    fn text_request(
        &self,
        message: &ModerationMessage,
        markup: &InlineKeyboardMarkup,
    ) -> RequestBuilder {
        self.client
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: self.settings.chat_id,
                text: escape_html(&message.text),
                reply_markup: markup,
                parse_mode: "HTML",
            })
    }

    fn media_request(
        &self,
        message: &ModerationMessage,
        attachment: &MediaAttachment,
        markup: &InlineKeyboardMarkup,
    ) -> Result<RequestBuilder, ModerationNotifierError> {
        let (method, field) = media_method(attachment.kind);
        let reply_markup = serde_json::to_string(markup)
            .map_err(|err| ModerationNotifierError::transport(err.to_string()))?;
        let file = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.content_type)
            .map_err(|err| ModerationNotifierError::transport(err.without_url().to_string()))?;
        let form = Form::new()
            .text("chat_id", self.settings.chat_id.to_string())
            .text("caption", message.text.clone())
            .text("reply_markup", reply_markup)
            .part(field, file);
        Ok(self.client.post(self.method_url(method)).multipart(form))
    }
}

fn media_method(kind: MediaKind) -> (&'static str, &'static str) {
    match kind {
        MediaKind::Photo => ("sendPhoto", "photo"),
        MediaKind::Video => ("sendVideo", "video"),
    }
}

/// Drop the request URL, which embeds the bot token.
fn transport_error(err: reqwest::Error) -> ModerationNotifierError {
    ModerationNotifierError::transport(err.without_url().to_string())
}

#[async_trait]
impl ModerationNotifier for TelegramNotifier {
    async fn deliver(&self, message: &ModerationMessage) -> Result<(), ModerationNotifierError> {
        let markup = InlineKeyboardMarkup::moderation(&message.actions);
        let request = match &message.attachment {
            Some(attachment) => self.media_request(message, attachment, &markup)?,
            None => self.text_request(message, &markup),
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            let preview = body_preview(&body);
            warn!(status = status.as_u16(), body = %preview, "moderation message rejected");
            return Err(ModerationNotifierError::rejected(status.as_u16(), preview));
        }
        debug!(
            with_attachment = message.attachment.is_some(),
            "moderation message delivered"
        );
        Ok(())
    }
}
