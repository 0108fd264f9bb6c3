use futures_util::{Stream, StreamExt};
use meshscope_core::telemetry::{TelemetryRingBuffer, TelemetrySample};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::api::NodeClient;
use crate::error::ClientError;

pub const LINK_STATS_ENDPOINT: &str = "link_stats";

/// Why a telemetry pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEnd {
    Cancelled,
    Closed,
}

/// Decode one pushed message; anything that is not a sample yields `None`.
pub fn decode_message(message: &Message) -> Option<TelemetrySample> {
    let decoded = match message {
        Message::Text(text) => serde_json::from_str::<TelemetrySample>(text),
        Message::Binary(data) => serde_json::from_slice::<TelemetrySample>(data),
        _ => return None,
    };

    match decoded {
        Ok(sample) => Some(sample),
        Err(e) => {
            log::warn!("Dropping malformed link stat: {}", e);
            None
        }
    }
}

/// Feed samples from `stream` into `buffer` one message at a time.
///
/// `on_update` runs after each accepted sample. Returns once `cancel` fires
/// or the stream ends; a transport error ends the pump like a close does.
pub async fn pump<S, F>(
    stream: &mut S,
    buffer: &mut TelemetryRingBuffer,
    cancel: &CancellationToken,
    mut on_update: F,
) -> PumpEnd
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
    F: FnMut(&TelemetryRingBuffer),
{
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PumpEnd::Cancelled,
            next = stream.next() => match next {
                Some(Ok(Message::Close(_))) | None => return PumpEnd::Closed,
                Some(Ok(message)) => {
                    if let Some(sample) = decode_message(&message) {
                        buffer.push(sample);
                        on_update(&*buffer);
                    }
                }
                Some(Err(e)) => {
                    log::warn!("Link stats stream error: {}", e);
                    return PumpEnd::Closed;
                }
            },
        }
    }
}

/// Live link statistics connection, open until `run` returns.
pub struct TelemetryStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

impl TelemetryStream {
    pub async fn connect(client: &NodeClient) -> Result<Self, ClientError> {
        let url = client.ws_url(LINK_STATS_ENDPOINT)?;
        let (socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        log::info!("Opened link stats connection to {}", url);
        Ok(Self { socket, url })
    }

    /// Pump samples until cancelled or the node drops the connection, then
    /// close the socket. There is no reconnect.
    pub async fn run<F>(
        mut self,
        buffer: &mut TelemetryRingBuffer,
        cancel: &CancellationToken,
        on_update: F,
    ) -> PumpEnd
    where
        F: FnMut(&TelemetryRingBuffer),
    {
        let end = pump(&mut self.socket, buffer, cancel, on_update).await;

        if end == PumpEnd::Cancelled {
            if let Err(e) = self.socket.close(None).await {
                log::debug!("Closing link stats connection: {}", e);
            }
        }
        log::info!("Closed link stats connection to {} ({:?})", self.url, end);

        end
    }
}
