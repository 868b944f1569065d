//! WebSocket link implementation using `tokio-tungstenite`.

use tokio_tungstenite::tungstenite::Message;

use crate::{DmLink, SessionId, TransportError, endpoint_url};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// The client side of one session's WebSocket.
///
/// Frames are sent as text — the DM service reads text frames and parses
/// them as JSON.
pub struct WsLink {
    session: SessionId,
    ws: WsStream,
}

impl WsLink {
    /// Dials `ws://<host>/ws/dnd/<session-id>`.
    pub async fn connect(host: &str, session: SessionId) -> Result<Self, TransportError> {
        let url = endpoint_url(host, &session);
        let (ws, _) = tokio_tungstenite::connect_async(&url).await.map_err(|e| {
            TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;
        tracing::info!(%url, session = %session, "DM link established");
        Ok(Self { session, ws })
    }

    /// The session id this link is scoped to.
    pub fn session(&self) -> &SessionId {
        &self.session
    }
}

impl DmLink for WsLink {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        use futures_util::SinkExt;
        let text = std::str::from_utf8(data).map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            ))
        })?;
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        use futures_util::StreamExt;
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.ws.close(None).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }
}
