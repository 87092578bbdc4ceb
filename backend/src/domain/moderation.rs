//! Moderation submissions and the message delivered to moderators.

use std::collections::HashMap;

use serde::Deserialize;

use super::{Error, Username};

/// Deep links to the reference answer for tasks that have one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AnswerLinks(HashMap<i64, String>);

impl AnswerLinks {
    pub fn new(links: HashMap<i64, String>) -> Self {
        Self(links)
    }

    /// Parse a JSON object keyed by task id.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, task_id: i64) -> Option<&str> {
        self.0.get(&task_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// File uploaded alongside a submission, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Media categories the moderation chat accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Classify by declared content type: `image/*` or `video/*`.
    pub fn classify(content_type: &str) -> Option<Self> {
        let top_level = content_type
            .split('/')
            .next()
            .map(|part| part.trim().to_ascii_lowercase());
        match top_level.as_deref() {
            Some("image") if content_type.contains('/') => Some(Self::Photo),
            Some("video") if content_type.contains('/') => Some(Self::Video),
            _ => None,
        }
    }
}

/// Classified media ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Classify the upload. An empty upload counts as no file.
    pub fn into_attachment(self) -> Result<Option<MediaAttachment>, Error> {
        if self.bytes.is_empty() {
            return Ok(None);
        }
        let content_type = self.content_type.unwrap_or_default();
        let Some(kind) = MediaKind::classify(&content_type) else {
            return Err(Error::invalid_request(format!(
                "unsupported media type: {content_type:?}"
            )));
        };
        Ok(Some(MediaAttachment {
            kind,
            file_name: self.file_name,
            content_type,
            bytes: self.bytes,
        }))
    }
}

/// Work submitted for human moderation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationSubmission {
    pub task_id: i64,
    pub user_id: i64,
    pub value: i64,
    pub text: Option<String>,
    pub file: Option<MediaUpload>,
}

/// Callback payloads behind the approve and reject buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationActions {
    pub approve: String,
    pub reject: String,
}

impl ModerationActions {
    pub fn for_submission(task_id: i64, user_id: i64, value: i64) -> Self {
        Self {
            approve: format!("approve_{task_id}_{user_id}_{value}"),
            reject: format!("reject_{task_id}_{user_id}"),
        }
    }
}

/// Fully composed message for the moderator chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationMessage {
    pub text: String,
    pub actions: ModerationActions,
    pub attachment: Option<MediaAttachment>,
}

impl ModerationMessage {
    /// Compose the moderator message for `submission` sent by `username`.
    ///
    /// Classification errors surface before anything is delivered.
    pub fn compose(
        submission: ModerationSubmission,
        username: &Username,
        links: &AnswerLinks,
    ) -> Result<Self, Error> {
        let ModerationSubmission {
            task_id,
            user_id,
            value,
            text,
            file,
        } = submission;

        let mut body =
            format!("📎 Task #{task_id}\n\n👤 User: @{username}\n\n💲 Points: {value}");
        if let Some(link) = links.get(task_id) {
            body.push_str(&format!("\n\nCheck answer: {link}"));
        }
        if let Some(text) = text.as_deref().filter(|text| !text.trim().is_empty()) {
            body.push_str(&format!("\n\n🖋 User text: {text}"));
        }

        let attachment = match file {
            Some(upload) => upload.into_attachment()?,
            None => None,
        };

        Ok(Self {
            text: body,
            actions: ModerationActions::for_submission(task_id, user_id, value),
            attachment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn links() -> AnswerLinks {
        AnswerLinks::from_json(r#"{"1": "https://t.me/c/2621459328/2"}"#).expect("valid links")
    }

    #[fixture]
    fn username() -> Username {
        Username::new("alice").expect("username")
    }

    fn submission(
        task_id: i64,
        text: Option<&str>,
        file: Option<MediaUpload>,
    ) -> ModerationSubmission {
        ModerationSubmission {
            task_id,
            user_id: 42,
            value: 15,
            text: text.map(str::to_owned),
            file,
        }
    }

    fn upload(content_type: &str, bytes: &[u8]) -> MediaUpload {
        MediaUpload {
            file_name: "proof.bin".to_owned(),
            content_type: Some(content_type.to_owned()),
            bytes: bytes.to_vec(),
        }
    }

    #[rstest]
    #[case("image/jpeg", Some(MediaKind::Photo))]
    #[case("IMAGE/png", Some(MediaKind::Photo))]
    #[case("video/mp4", Some(MediaKind::Video))]
    #[case("application/pdf", None)]
    #[case("image", None)]
    #[case("", None)]
    fn classifies_by_top_level_type(
        #[case] content_type: &str,
        #[case] expected: Option<MediaKind>,
    ) {
        assert_eq!(MediaKind::classify(content_type), expected);
    }

    #[rstest]
    fn callbacks_follow_moderation_bot_format() {
        let actions = ModerationActions::for_submission(3, 42, 15);
        assert_eq!(actions.approve, "approve_3_42_15");
        assert_eq!(actions.reject, "reject_3_42");
    }

    #[rstest]
    fn message_includes_link_and_text(links: AnswerLinks, username: Username) {
        let message =
            ModerationMessage::compose(submission(1, Some("done!"), None), &username, &links)
                .expect("compose succeeds");
        assert_eq!(
            message.text,
            "📎 Task #1\n\n👤 User: @alice\n\n💲 Points: 15\n\n\
             Check answer: https://t.me/c/2621459328/2\n\n🖋 User text: done!"
        );
        assert!(message.attachment.is_none());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn blank_text_and_unknown_link_are_omitted(
        #[case] text: Option<&str>,
        links: AnswerLinks,
        username: Username,
    ) {
        let message = ModerationMessage::compose(submission(2, text, None), &username, &links)
            .expect("compose succeeds");
        assert_eq!(message.text, "📎 Task #2\n\n👤 User: @alice\n\n💲 Points: 15");
    }

    #[rstest]
    fn empty_upload_counts_as_no_file(links: AnswerLinks, username: Username) {
        let message = ModerationMessage::compose(
            submission(2, None, Some(upload("application/octet-stream", b""))),
            &username,
            &links,
        )
        .expect("empty upload ignored");
        assert!(message.attachment.is_none());
    }

    #[rstest]
    fn unsupported_upload_is_rejected(links: AnswerLinks, username: Username) {
        let err = ModerationMessage::compose(
            submission(2, None, Some(upload("application/pdf", b"%PDF"))),
            &username,
            &links,
        )
        .expect_err("pdf rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn video_upload_is_attached(links: AnswerLinks, username: Username) {
        let message = ModerationMessage::compose(
            submission(2, None, Some(upload("video/mp4", b"\x00\x01"))),
            &username,
            &links,
        )
        .expect("video accepted");
        let attachment = message.attachment.expect("attachment present");
        assert_eq!(attachment.kind, MediaKind::Video);
        assert_eq!(attachment.content_type, "video/mp4");
    }
}
