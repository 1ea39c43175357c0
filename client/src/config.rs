use std::time::Duration;

pub const ROOM_INFO_URL: &str = "https://riven.panda.tv/chatroom/getinfo";
pub const WEB_ORIGIN: &str = "https://www.panda.tv";

/// Everything a session needs besides the room id.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Room-info endpoint queried before connecting
    pub info_url: String,
    /// Sent as `_caller` on the room-info request
    pub caller: String,
    /// `Origin` header for the websocket handshake
    pub origin: String,
    pub heartbeat_interval: Duration,
    pub platform: String,
    pub version: String,
    pub pdft: String,
    pub network: String,
    pub compress: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            info_url: ROOM_INFO_URL.to_string(),
            caller: "panda-pc_web".to_string(),
            origin: WEB_ORIGIN.to_string(),
            heartbeat_interval: Duration::from_secs(30),
            platform: "jssdk_pc_web".to_string(),
            version: "0.5.9".to_string(),
            pdft: String::new(),
            network: "unknown".to_string(),
            compress: "zlib".to_string(),
        }
    }
}
