//! WebSocket connection to the application feed.
//!
//! The connection is established in a background task. Parsed messages
//! arrive on an mpsc receiver; outgoing requests issued before the socket
//! is open wait for it, polling at a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::{FeedError, FeedMessage, SubscribeRequest};

/// Capacity of the incoming message channel.
const INCOMING_CAPACITY: usize = 256;

/// Lifecycle of a feed connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    /// Closed normally, by either side.
    Closed,
    /// The handshake or the stream failed.
    Failed(String),
}

/// Handle to a feed WebSocket.
///
/// Dropping the handle closes the connection.
pub struct FeedConnection {
    url: String,
    state: Arc<RwLock<ConnectionState>>,
    outgoing: mpsc::Sender<String>,
    task: JoinHandle<()>,
    retry: Duration,
}

impl FeedConnection {
    /// Starts connecting to `url` in the background.
    ///
    /// `retry` is the poll interval used by [`Self::subscribe`] while the
    /// socket is still connecting. Must be called within a tokio runtime.
    #[must_use]
    pub fn connect(url: impl Into<String>, retry: Duration) -> (Self, mpsc::Receiver<FeedMessage>) {
        let url = url.into();
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));
        let (outgoing_tx, outgoing_rx) = mpsc::channel(16);
        let (incoming_tx, incoming_rx) = mpsc::channel(INCOMING_CAPACITY);

        let task = tokio::spawn(run_connection(
            url.clone(),
            outgoing_rx,
            incoming_tx,
            Arc::clone(&state),
        ));

        let connection = Self {
            url,
            state,
            outgoing: outgoing_tx,
            task,
            retry,
        };
        (connection, incoming_rx)
    }

    #[must_use]
    pub fn url(&self) -> &str { &self.url }

    #[must_use]
    pub fn state(&self) -> ConnectionState { self.state.read().clone() }

    #[must_use]
    pub fn is_open(&self) -> bool { *self.state.read() == ConnectionState::Open }

    /// Sends a subscription, waiting for the socket to open first.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::ConnectionFailed`] if the handshake failed and
    /// [`FeedError::Closed`] if the connection is gone.
    pub async fn subscribe(&self, request: &SubscribeRequest) -> Result<(), FeedError> {
        self.wait_until_open().await?;
        tracing::debug!(kind = %request.kind, "sending log subscription");
        self.outgoing.send(request.to_json()).await.map_err(|_| FeedError::Closed)
    }

    async fn wait_until_open(&self) -> Result<(), FeedError> {
        loop {
            match self.state() {
                ConnectionState::Open => return Ok(()),
                ConnectionState::Connecting => tokio::time::sleep(self.retry).await,
                ConnectionState::Closed => return Err(FeedError::Closed),
                ConnectionState::Failed(reason) => {
                    return Err(FeedError::ConnectionFailed { url: self.url.clone(), reason });
                }
            }
        }
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) { self.task.abort(); }
}

async fn run_connection(
    url: String,
    mut outgoing: mpsc::Receiver<String>,
    incoming: mpsc::Sender<FeedMessage>,
    state: Arc<RwLock<ConnectionState>>,
) {
    tracing::info!(%url, "connecting to feed");

    let ws_stream = match connect_async(&url).await {
        Ok((stream, _)) => stream,
        Err(err) => {
            tracing::warn!(%url, error = %err, "feed connection failed");
            *state.write() = ConnectionState::Failed(err.to_string());
            return;
        }
    };

    *state.write() = ConnectionState::Open;
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => match FeedMessage::parse(&text) {
                    Ok(Some(message)) => {
                        if incoming.send(message).await.is_err() {
                            tracing::debug!("feed receiver dropped, closing");
                            if let Err(err) = write.close().await {
                                tracing::trace!(error = %err, "feed close failed");
                            }
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "failed to parse feed message"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("feed closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "feed stream error");
                    *state.write() = ConnectionState::Failed(err.to_string());
                    return;
                }
            },

            request = outgoing.recv() => match request {
                Some(text) => {
                    if let Err(err) = write.send(Message::Text(text.into())).await {
                        tracing::warn!(error = %err, "failed to send feed message");
                        *state.write() = ConnectionState::Failed(err.to_string());
                        return;
                    }
                }
                None => {
                    if let Err(err) = write.close().await {
                        tracing::trace!(error = %err, "feed close failed");
                    }
                    break;
                }
            },
        }
    }

    *state.write() = ConnectionState::Closed;
}
