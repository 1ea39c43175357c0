mod chat;
mod envelope;
mod tests;

pub use chat::{
    CHAT_MARKER, ChatMessage, ChatPayload, ChatSender, SUB_HEADER_LEN, decode_text, extract,
    extract_candidates,
};
pub use envelope::{ENVELOPE_BASE, decompress};

use crate::frame::{FrameHeader, Opcode, decode_header};
use crate::{DecodeError, ExtractError};

/// Inbound blobs shorter than this are ignored without decoding.
pub const MIN_FRAME_LEN: usize = 5;

/// One inbound frame after decoding.
#[derive(Debug)]
pub struct ServerFrame {
    pub header: FrameHeader,
    /// Chat messages in stream order. Always empty for non-data frames.
    pub messages: Vec<ChatMessage>,
    /// Candidates that looked like chat but failed to parse.
    pub rejected: Vec<ExtractError>,
}

impl ServerFrame {
    pub fn is_data(&self) -> bool {
        self.header.opcode == Opcode::Data
    }
}

/// Decode a complete binary websocket message.
///
/// Returns `Ok(None)` for blobs below [`MIN_FRAME_LEN`]. Only data frames
/// are decompressed; every other opcode yields a frame with no messages.
pub fn parse_server_frame(bytes: &[u8]) -> Result<Option<ServerFrame>, DecodeError> {
    if bytes.len() < MIN_FRAME_LEN {
        return Ok(None);
    }

    let header = decode_header(bytes)?;
    let mut frame = ServerFrame {
        header,
        messages: Vec::new(),
        rejected: Vec::new(),
    };

    if frame.is_data() {
        let raw = decompress(bytes)?;
        for candidate in extract_candidates(&decode_text(&raw)) {
            match candidate {
                Ok(message) => frame.messages.push(message),
                Err(e) => frame.rejected.push(e),
            }
        }
    }

    Ok(Some(frame))
}
