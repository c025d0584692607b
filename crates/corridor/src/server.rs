//! `CorridorServer` builder and server loop.
//!
//! This is the entry point for running a Corridor server. It ties
//! together all the layers: transport → protocol → session → room.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use corridor_protocol::{Codec, JsonCodec};
use corridor_room::{RoomConfig, RoomDirectory};
use corridor_session::IdentityRegistry;
use corridor_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::CorridorError;

/// Port used when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 3000;

/// Server-wide settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// How long a finished room lingers (so clients can show the result)
    /// before it is torn down.
    pub teardown_delay: Duration,

    /// Drop connections that send nothing for this long. `None` keeps
    /// quiet connections open indefinitely, which suits a turn-based game
    /// where waiting players may not talk for minutes.
    pub idle_timeout: Option<Duration>,

    /// Limits applied to every room.
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            teardown_delay: Duration::from_secs(10),
            idle_timeout: None,
            room: RoomConfig::default(),
        }
    }
}

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) identities: Mutex<IdentityRegistry>,
    pub(crate) rooms: Mutex<RoomDirectory>,
    pub(crate) codec: C,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a Corridor server.
///
/// # Example
///
/// ```rust,no_run
/// use corridor::prelude::*;
///
/// # async fn run() -> Result<(), CorridorError> {
/// let server = CorridorServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct CorridorServerBuilder {
    bind_addr: String,
    config: ServerConfig,
}

impl CorridorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets how long a finished room stays around before teardown.
    pub fn teardown_delay(mut self, delay: Duration) -> Self {
        self.config.teardown_delay = delay;
        self
    }

    /// Drops connections that stay silent for `timeout`.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = Some(timeout);
        self
    }

    /// Sets the per-room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Replaces the whole server configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and builds the server with the JSON codec.
    pub async fn build(self) -> Result<CorridorServer<JsonCodec>, CorridorError> {
        self.build_with_codec(JsonCodec).await
    }

    /// Binds the listener and builds the server with a custom codec.
    pub async fn build_with_codec<C: Codec>(
        self,
        codec: C,
    ) -> Result<CorridorServer<C>, CorridorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            identities: Mutex::new(IdentityRegistry::new()),
            rooms: Mutex::new(RoomDirectory::new(self.config.room.clone())),
            codec,
            config: self.config,
        });

        Ok(CorridorServer { transport, state })
    }
}

impl Default for CorridorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Corridor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CorridorServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl CorridorServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> CorridorServerBuilder {
        CorridorServerBuilder::new()
    }
}

impl<C: Codec> CorridorServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, CorridorError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated; a failed accept (bad handshake, client gone)
    /// is logged and the loop continues.
    pub async fn run(mut self) -> Result<(), CorridorError> {
        tracing::info!("Corridor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
