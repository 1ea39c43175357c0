use thiserror::Error;

pub mod client;
pub mod frame;
pub mod server;

pub use client::{ClientFrame, LoginRequest};
pub use frame::{FrameHeader, Opcode, decode_header, encode};
pub use server::{
    ChatMessage, ChatPayload, ChatSender, ServerFrame, decompress, extract, extract_candidates,
    parse_server_frame,
};

/// Failure to turn one inbound frame into raw text. The frame is dropped.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Frame too short: {len} bytes, need at least {needed}")]
    TooShort { len: usize, needed: usize },

    #[error("Compressed data offset {start} is past the end of a {len} byte frame")]
    OffsetOutOfBounds { start: usize, len: usize },

    #[error("Inflate failed: {0}")]
    Inflate(#[from] std::io::Error),
}

/// Failure to parse one chat candidate. Sibling candidates are unaffected.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No closing brace found before the second chat object")]
    Unterminated,

    #[error("Invalid chat JSON: {0}")]
    Json(#[from] serde_json::Error),
}
