//! Bot API request bodies.

use serde::Serialize;

use crate::domain::ModerationActions;

const APPROVE_LABEL: &str = "Approve";
const REJECT_LABEL: &str = "Reject";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct InlineKeyboardButton {
    pub text: &'static str,
    pub callback_data: String,
}

/// Two single-button rows: approve above reject.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn moderation(actions: &ModerationActions) -> Self {
        Self {
            inline_keyboard: vec![
                vec![InlineKeyboardButton {
                    text: APPROVE_LABEL,
                    callback_data: actions.approve.clone(),
                }],
                vec![InlineKeyboardButton {
                    text: REJECT_LABEL,
                    callback_data: actions.reject.clone(),
                }],
            ],
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: String,
    pub reply_markup: &'a InlineKeyboardMarkup,
    pub parse_mode: &'static str,
}

/// Escape the characters the `HTML` parse mode treats as markup.
pub(super) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
