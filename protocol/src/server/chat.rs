use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ExtractError;

/// Bytes at the front of every inflated payload that precede the text.
pub const SUB_HEADER_LEN: usize = 16;

/// Start of every ordinary chat object.
pub const CHAT_MARKER: &str = r#"{"type":"1""#;

/// An ordinary chat event (`"type":"1"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    pub data: ChatPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub from: ChatSender,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSender {
    #[serde(rename = "nickName")]
    pub nick_name: String,
    /// Sender fields not modelled here (rid, level, identity, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn nickname(&self) -> &str {
        &self.data.from.nick_name
    }

    pub fn content(&self) -> &str {
        &self.data.content
    }
}

/// Strip the sub-header and decode the rest as UTF-8, dropping invalid
/// sequences and trimming surrounding whitespace.
pub fn decode_text(raw: &[u8]) -> String {
    let body = raw.get(SUB_HEADER_LEN..).unwrap_or_default();
    let text: String = body.utf8_chunks().map(|chunk| chunk.valid()).collect();
    text.trim().to_string()
}

/// Locate up to two chat objects in decoded text.
///
/// A blob may hold two chat events back to back. The first object is taken
/// to end at the last `}` before the final marker; anything in between two
/// markers beyond that is not recovered.
pub fn extract_candidates(text: &str) -> Vec<Result<ChatMessage, ExtractError>> {
    let (Some(first), Some(last)) = (text.find(CHAT_MARKER), text.rfind(CHAT_MARKER)) else {
        return Vec::new();
    };

    if first == last {
        return vec![parse(&text[first..])];
    }

    let leading = match text[first..last].rfind('}') {
        Some(end) => parse(&text[first..=first + end]),
        None => Err(ExtractError::Unterminated),
    };

    vec![leading, parse(&text[last..])]
}

/// Chat messages found in an inflated payload, in stream order.
///
/// Never fails: candidates that do not parse are skipped.
pub fn extract(raw: &[u8]) -> Vec<ChatMessage> {
    extract_candidates(&decode_text(raw))
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}

fn parse(candidate: &str) -> Result<ChatMessage, ExtractError> {
    Ok(serde_json::from_str(candidate)?)
}
