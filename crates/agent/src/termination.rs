//! The session stop condition.
//!
//! A drafting session is treated as finished once a successful tool
//! result reports that the document was saved. The check sniffs result
//! text for compatibility with the wider tool surface: any successful
//! result whose text mentions both "saved" and "document" counts, so a
//! save does not need a dedicated signal type. The policy lives in this
//! one predicate so it can be swapped for an explicit done-signal without
//! touching the loop.

use drafter_core::message::Transcript;

/// Whether the transcript contains a successful saved-document result.
///
/// Scans from the newest message backward. Failed results never
/// terminate the session, whatever their text says.
pub fn is_session_complete(transcript: &Transcript) -> bool {
    for message in transcript.iter_newest_first() {
        if !message.is_successful_tool_result() {
            continue;
        }
        let text = message.content.to_lowercase();
        if text.contains("saved") && text.contains("document") {
            return true;
        }
    }
    false
}
