use crate::frame::{self, HEARTBEAT, Opcode};

/// Fields of the login handshake, sent once right after the socket opens.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub rid: String,
    pub appid: String,
    pub ts: String,
    pub sign: String,
    pub auth_type: String,
    pub platform: String,
    pub version: String,
    pub pdft: String,
    pub network: String,
    pub compress: String,
}

impl LoginRequest {
    /// Serialize to newline-joined `key:value` text
    pub fn to_protocol_string(&self) -> String {
        [
            format!("u:{}@{}", self.rid, self.appid),
            format!("ts:{}", self.ts),
            format!("sign:{}", self.sign),
            format!("authtype:{}", self.auth_type),
            format!("plat:{}", self.platform),
            format!("version:{}", self.version),
            format!("pdft:{}", self.pdft),
            format!("network:{}", self.network),
            format!("compress:{}", self.compress),
        ]
        .join("\n")
    }
}

/// Frames the client sends to the chat server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    /// 00 06 00 02 LEN LOGIN-TEXT
    Login(LoginRequest),

    /// 00 06 00 00
    Heartbeat,
}

impl ClientFrame {
    /// Serialize to wire bytes
    pub fn to_wire_format(&self) -> Vec<u8> {
        match self {
            Self::Login(login) => frame::encode(Opcode::Login, login.to_protocol_string().as_bytes()),
            Self::Heartbeat => HEARTBEAT.to_vec(),
        }
    }
}
