//! Outbound size limit.

use currva_core::formatting::messages::OVERSIZED_OUTPUT_NOTICE;

/// Longest text a chat transport accepts in one message, in characters.
pub const MAX_OUTPUT_CHARS: usize = 4096;

/// Passes `text` through, or the fixed notice when it is too long to send.
pub fn guard_output(text: String) -> String {
    let length = text.chars().count();
    if length > MAX_OUTPUT_CHARS {
        tracing::warn!("Replacing {}-character output with size notice", length);
        return OVERSIZED_OUTPUT_NOTICE.to_string();
    }
    text
}
