//! Async client for Panda TV danmaku (live chat).
//!
//! A [`Session`] resolves a room, connects to its chat server, keeps the
//! connection alive with heartbeats and queues every ordinary chat message
//! it decodes into a [`Buffer`] for the caller to poll.
//!
//! ```ignore
//! let session = Session::start("12345", SessionConfig::default());
//! loop {
//!     while let Some(msg) = session.pop() {
//!         println!("@{}: {}", msg.nickname(), msg.content());
//!     }
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//! }
//! ```

mod buffer;
mod config;
pub mod connection;
mod error;
pub mod room;
mod sender;
mod session;
mod state;
#[cfg(test)]
mod testutil;

pub use danmaku_protocol::{ChatMessage, ChatPayload, ChatSender, ClientFrame, LoginRequest};

pub use buffer::Buffer;
pub use config::{ROOM_INFO_URL, SessionConfig, WEB_ORIGIN};
pub use error::{ClientError, Result};
pub use room::{RoomInfo, RoomResolver};
pub use session::Session;
pub use state::SessionState;
