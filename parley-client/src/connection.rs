//! Endpoint connection management
//!
//! Maintains at most one WebSocket connection to the chat endpoint, with
//! a spawned socket task bridging the stream to mpsc channels. There is
//! no automatic reconnect and no retry of failed sends.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use parley_utils::{ParleyError, Result};

/// How long to wait for the socket task's close handshake
const SHUTDOWN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Connection state, mutated only by user actions and connection events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        write!(f, "{}", s)
    }
}

/// Events surfaced by the socket task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// An inbound text frame, unparsed
    Message(String),
    /// The connection ended (remote close, error, or stream end)
    Closed,
}

/// Client connection to the chat endpoint
pub struct Connection {
    /// Endpoint address (ws:// or wss://)
    endpoint: String,
    /// Current state
    state: ConnectionState,
    /// Channel for outgoing wire text
    tx: mpsc::Sender<String>,
    /// Channel for events from the socket task
    rx: mpsc::Receiver<ChatEvent>,
    /// Handle to the socket task
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl Connection {
    /// Create a new connection (not yet connected)
    pub fn new(endpoint: impl Into<String>) -> Self {
        let (tx, _) = mpsc::channel(100);
        let (_, rx) = mpsc::channel(100);
        Self {
            endpoint: endpoint.into(),
            state: ConnectionState::Disconnected,
            tx,
            rx,
            task_handle: None,
        }
    }

    /// Get current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Endpoint address this connection targets
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Replace the endpoint address (takes effect on the next connect)
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
    }

    /// Validate an endpoint address without connecting
    ///
    /// Accepts ws:// and wss:// URLs with a host.
    pub fn validate_endpoint(endpoint: &str) -> Result<()> {
        let url = Url::parse(endpoint)
            .map_err(|e| ParleyError::invalid_endpoint(endpoint, e.to_string()))?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ParleyError::invalid_endpoint(
                    endpoint,
                    format!("unsupported scheme '{}'", other),
                ));
            }
        }
        if url.host_str().is_none() {
            return Err(ParleyError::invalid_endpoint(endpoint, "missing host"));
        }
        Ok(())
    }

    /// Connect to the endpoint
    ///
    /// A malformed endpoint fails fast: no connection is attempted and
    /// the state stays Disconnected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }

        Self::validate_endpoint(&self.endpoint)?;

        self.state = ConnectionState::Connecting;
        tracing::info!(endpoint = %self.endpoint, "Connecting");

        let (ws, _response) = match connect_async(self.endpoint.as_str()).await {
            Ok(ok) => ok,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(ParleyError::connection(format!(
                    "Failed to connect to {}: {}",
                    self.endpoint, e
                )));
            }
        };

        let (outgoing_tx, outgoing_rx) = mpsc::channel::<String>(100);
        let (event_tx, event_rx) = mpsc::channel::<ChatEvent>(100);

        self.tx = outgoing_tx;
        self.rx = event_rx;
        self.task_handle = Some(tokio::spawn(Self::socket_task(ws, outgoing_rx, event_tx)));

        self.state = ConnectionState::Connected;
        tracing::info!(endpoint = %self.endpoint, "Connected");
        Ok(())
    }

    /// Disconnect from the endpoint
    ///
    /// Dropping the outgoing sender lets the socket task put a Close
    /// frame on the wire before winding down; a task that does not wind
    /// down in time is aborted.
    pub async fn disconnect(&mut self) {
        if let Some(mut handle) = self.task_handle.take() {
            let (tx, _) = mpsc::channel(1);
            self.tx = tx;
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut handle)
                .await
                .is_err()
            {
                handle.abort();
            }
        }
        self.state = ConnectionState::Disconnected;
        tracing::info!("Disconnected");
    }

    /// Record a remote-initiated close
    ///
    /// Called after a [`ChatEvent::Closed`] so later [`recv`] calls park
    /// instead of replaying the closed channel.
    ///
    /// [`recv`]: Connection::recv
    pub fn mark_closed(&mut self) {
        self.task_handle = None;
        self.state = ConnectionState::Disconnected;
    }

    /// Send a text frame to the endpoint
    ///
    /// Fails with [`ParleyError::NotConnected`] when no connection is
    /// live; nothing is queued.
    pub async fn send_text(&self, text: String) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(ParleyError::NotConnected);
        }
        self.tx
            .send(text)
            .await
            .map_err(|_| ParleyError::ConnectionClosed)
    }

    /// Receive the next connection event
    ///
    /// Parks forever while disconnected, so it can sit in a select loop
    /// alongside user input.
    pub async fn recv(&mut self) -> Option<ChatEvent> {
        if self.state == ConnectionState::Disconnected {
            std::future::pending::<()>().await;
        }
        self.rx.recv().await
    }

    /// Socket task: bridges the WebSocket to the channels
    async fn socket_task(
        ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
        mut outgoing: mpsc::Receiver<String>,
        events: mpsc::Sender<ChatEvent>,
    ) {
        let (mut sink, mut stream) = ws.split();

        loop {
            tokio::select! {
                // Outgoing wire text
                msg = outgoing.recv() => match msg {
                    Some(text) => {
                        if let Err(e) = sink.send(Message::Text(text.into())).await {
                            tracing::warn!("Failed to send frame: {}", e);
                            break;
                        }
                    }
                    None => {
                        // Connection handle dropped: close the stream
                        // gracefully before winding down
                        if let Err(e) = sink.close().await {
                            tracing::debug!("Close handshake failed: {}", e);
                        }
                        break;
                    }
                },

                // Inbound frames
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if events.send(ChatEvent::Message(text.as_str().to_string())).await.is_err() {
                            tracing::debug!("Event channel closed, receiver dropped");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Remote closed connection");
                        break;
                    }
                    Some(Ok(other)) => {
                        tracing::debug!(frame = ?std::mem::discriminant(&other), "Ignoring non-text frame");
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        tracing::info!("Stream ended");
                        break;
                    }
                },
            }
        }

        let _ = events.send(ChatEvent::Closed).await;
    }
}
