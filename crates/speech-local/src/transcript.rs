use crate::RecognizerResult;

/// Pull the transcript out of a raw recognizer payload.
///
/// The payload is decoded against the `RecognizerResult` schema rather than
/// pattern-matched. Returns the lowercased transcript, or `None` when the
/// payload is malformed or has no `text` field. Never panics.
pub fn extract_transcript(payload: &str) -> Option<String> {
    let result: RecognizerResult = serde_json::from_str(payload).ok()?;
    Some(result.text.to_lowercase())
}
