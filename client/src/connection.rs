use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::ORIGIN};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::{ClientError, Result};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handshake request for a chat server given as `host:port`
pub fn handshake_request(addr: &str, origin: &str) -> Result<Request> {
    let mut request = format!("wss://{addr}").into_client_request()?;
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| ClientError::Config(format!("invalid origin {origin:?}: {e}")))?;
    request.headers_mut().insert(ORIGIN, origin);
    Ok(request)
}

/// Open a TLS websocket to a chat server
pub async fn connect(addr: &str, origin: &str) -> Result<WsStream> {
    let request = handshake_request(addr, origin)?;
    let (ws, _response) = connect_async(request).await?;
    Ok(ws)
}
