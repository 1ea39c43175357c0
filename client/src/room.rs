use std::time::{SystemTime, UNIX_EPOCH};

use danmaku_protocol::LoginRequest;
use serde_json::Value;

use crate::config::SessionConfig;
use crate::error::{ClientError, Result};

/// Connection parameters for one chat room, as returned by the room-info
/// endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    pub rid: String,
    pub appid: String,
    pub ts: String,
    pub sign: String,
    pub auth_type: String,
    /// Candidate chat servers as `host:port`
    pub addresses: Vec<String>,
}

impl RoomInfo {
    /// Parse a room-info response body
    pub fn from_response(body: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(body)
            .map_err(|e| ClientError::Protocol(format!("invalid JSON: {e}")))?;

        let data = json
            .get("data")
            .ok_or_else(|| ClientError::Protocol("missing data object".to_string()))?;

        let addresses = data
            .get("chat_addr_list")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ClientError::Protocol("missing chat_addr_list".to_string()))?
            .iter()
            .map(|addr| {
                addr.as_str().map(str::to_string).ok_or_else(|| {
                    ClientError::Protocol("chat_addr_list entry is not a string".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if addresses.is_empty() {
            return Err(ClientError::Protocol("chat_addr_list is empty".to_string()));
        }

        Ok(Self {
            rid: field(data, "rid")?,
            appid: field(data, "appid")?,
            ts: field(data, "ts")?,
            sign: field(data, "sign")?,
            auth_type: field(data, "authType")?,
            addresses,
        })
    }

    /// The server a session connects to. Later candidates are never tried.
    pub fn primary_addr(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }

    pub fn login_request(&self, config: &SessionConfig) -> LoginRequest {
        LoginRequest {
            rid: self.rid.clone(),
            appid: self.appid.clone(),
            ts: self.ts.clone(),
            sign: self.sign.clone(),
            auth_type: self.auth_type.clone(),
            platform: config.platform.clone(),
            version: config.version.clone(),
            pdft: config.pdft.clone(),
            network: config.network.clone(),
            compress: config.compress.clone(),
        }
    }
}

// The endpoint mixes strings and numbers for these fields.
fn field(data: &Value, key: &str) -> Result<String> {
    match data.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ClientError::Protocol(format!(
            "field {key} has unexpected type: {other}"
        ))),
        None => Err(ClientError::Protocol(format!("missing field {key}"))),
    }
}

/// One-shot lookup of a room's chat server parameters
pub struct RoomResolver {
    http: reqwest::Client,
    info_url: String,
    caller: String,
}

impl RoomResolver {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            info_url: config.info_url.clone(),
            caller: config.caller.clone(),
        }
    }

    /// Build the GET request for a room at the given unix time
    pub fn request(&self, room_id: &str, unix_secs: u64) -> Result<reqwest::Request> {
        let timestamp = unix_secs.to_string();
        let params = [
            ("roomid", room_id),
            ("app", "1"),
            ("protocol", "ws"),
            ("_caller", self.caller.as_str()),
            ("_", timestamp.as_str()),
        ];

        Ok(self.http.get(&self.info_url).query(&params).build()?)
    }

    /// Fetch room info. A single attempt; no retries.
    pub async fn resolve(&self, room_id: &str) -> Result<RoomInfo> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let request = self.request(room_id, now)?;
        let body = self
            .http
            .execute(request)
            .await?
            .error_for_status()?
            .text()
            .await?;

        let info = RoomInfo::from_response(&body)?;
        tracing::info!(
            room_id,
            rid = %info.rid,
            servers = info.addresses.len(),
            "Resolved room"
        );
        Ok(info)
    }
}
