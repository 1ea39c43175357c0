use danmaku_protocol::ClientFrame;
use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::error::{ClientError, Result};

/// Cloneable handle for writing to the chat server.
///
/// A single writer task owns the socket's sink; every clone feeds it through
/// a channel. Once the writer has closed the socket, sends fail with
/// [`ClientError::Closed`].
#[derive(Clone)]
pub(crate) struct FrameSender {
    outgoing: mpsc::UnboundedSender<Message>,
}

impl FrameSender {
    /// Start the writer task for `sink`
    pub(crate) fn spawn<Si>(sink: Si) -> (Self, JoinHandle<()>)
    where
        Si: Sink<Message, Error = WsError> + Send + 'static,
    {
        let (outgoing, incoming) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_loop(sink, incoming));
        (Self { outgoing }, writer)
    }

    pub fn send_frame(&self, frame: &ClientFrame) -> Result<()> {
        self.send_message(Message::Binary(frame.to_wire_format()))
    }

    pub(crate) fn send_message(&self, message: Message) -> Result<()> {
        self.outgoing.send(message).map_err(|_| ClientError::Closed)
    }

    /// Ask the writer to close the socket. Later sends fail.
    pub fn close(&self) -> Result<()> {
        self.send_message(Message::Close(None))
    }
}

async fn write_loop<Si>(sink: Si, mut incoming: mpsc::UnboundedReceiver<Message>)
where
    Si: Sink<Message, Error = WsError>,
{
    tokio::pin!(sink);

    while let Some(message) = incoming.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = sink.send(message).await {
            tracing::warn!(error = %e, "Failed to write to chat server");
            break;
        }
        if closing {
            break;
        }
    }

    incoming.close();
    if let Err(e) = sink.close().await {
        tracing::debug!(error = %e, "Error while closing websocket");
    }
}
