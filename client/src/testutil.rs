//! Local HTTP fixture for room-info requests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub(crate) fn room_body(addresses: &[&str]) -> String {
    serde_json::json!({
        "errno": 0,
        "errmsg": "",
        "data": {
            "rid": "r1",
            "appid": "a1",
            "ts": "t1",
            "sign": "s1",
            "authType": "0",
            "chat_addr_list": addresses,
        }
    })
    .to_string()
}

/// Answer one HTTP request with `status` (e.g. `"200 OK"`) and `body`.
///
/// Returns a room-info URL pointing at the server and a handle resolving to
/// the request line it received.
pub(crate) async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/chatroom/getinfo", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (url, server)
}
