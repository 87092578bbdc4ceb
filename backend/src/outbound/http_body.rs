//! Helpers shared by the reqwest-backed adapters.

const PREVIEW_CHARS: usize = 160;

/// Lossy, length-capped rendering of a response body for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    let mut preview: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}
