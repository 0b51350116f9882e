//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Board server
//!
//! The BoardServer owns the TCP listener, accepts connections and hands
//! them to the ConnectionManager. Every session shares the same board.

use crate::{
    BoardHandler, ConnectionManager, MetricsSnapshot, Result, ServerConfig, ServerError,
    ServerMetrics, SessionHandler, SharedBoard,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Bulletin board TCP server
///
/// # Example
///
/// ```no_run
/// use bboard_board::BoardConfig;
/// use bboard_service::{BoardServer, ServerConfig, SharedBoard};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let board = SharedBoard::from_config(BoardConfig::new(100, 50, 10, 10, ["red", "blue"])?);
///     let server = BoardServer::new(ServerConfig::new("0.0.0.0:4554".parse()?), board).await?;
///
///     server.start().await?;
///     tokio::signal::ctrl_c().await?;
///     server.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct BoardServer {
    config: ServerConfig,
    board: SharedBoard,
    handler: Arc<dyn SessionHandler>,
    manager: Arc<ConnectionManager>,
    metrics: Arc<ServerMetrics>,
    /// TCP listener, shared with the accept loop
    listener: Arc<TcpListener>,
    /// Actual bind address
    bind_address: SocketAddr,
    running: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
    accept_handle: Mutex<Option<JoinHandle<()>>>,
}

impl BoardServer {
    /// Create a new server serving `board`
    ///
    /// This validates the configuration and binds the listener but does not
    /// start accepting connections. Call [`start`](Self::start) for that.
    pub async fn new(config: ServerConfig, board: SharedBoard) -> Result<Self> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        let listener = TcpListener::bind(config.bind_address).await?;
        let actual_addr = listener.local_addr()?;

        let metrics = Arc::new(ServerMetrics::new());
        let manager = Arc::new(ConnectionManager::new(&config, metrics.clone()));
        let handler: Arc<dyn SessionHandler> = Arc::new(BoardHandler::new(board.clone()));

        info!(bind_address = %actual_addr, "Board server bound");

        Ok(Self {
            config,
            board,
            handler,
            manager,
            metrics,
            listener: Arc::new(listener),
            bind_address: actual_addr,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
            accept_handle: Mutex::new(None),
        })
    }

    /// Start accepting connections
    ///
    /// The accept loop runs on its own task until [`shutdown`](Self::shutdown).
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyRunning);
        }

        info!(bind_address = %self.bind_address, "Starting board server");

        let handle = self.spawn_accept_loop();
        *self.accept_handle.lock().await = Some(handle);

        Ok(())
    }

    fn spawn_accept_loop(&self) -> JoinHandle<()> {
        let listener = self.listener.clone();
        let manager = self.manager.clone();
        let metrics = self.metrics.clone();
        let handler = self.handler.clone();
        let running = self.running.clone();
        let shutdown_notify = self.shutdown_notify.clone();

        tokio::spawn(async move {
            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let accept_result = tokio::select! {
                    result = listener.accept() => result,
                    _ = shutdown_notify.notified() => break,
                };

                match accept_result {
                    Ok((socket, peer_addr)) => {
                        debug!(peer_addr = %peer_addr, "Accepted connection");

                        match manager.add_connection(socket, handler.clone()) {
                            Ok(id) => {
                                info!(connection_id = %id, peer_addr = %peer_addr, "Connection established");
                            }
                            Err(err @ ServerError::MaxConnectionsReached(_)) => {
                                warn!(peer_addr = %peer_addr, error = %err, "Rejecting connection");
                                metrics.connection_rejected();
                            }
                            Err(err) => {
                                error!(peer_addr = %peer_addr, error = %err, "Failed to add connection");
                                metrics.transport_error();
                            }
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "Failed to accept connection");
                        metrics.transport_error();

                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }

            info!("Accept loop terminated");
        })
    }

    /// Shutdown the server gracefully
    ///
    /// Stops accepting new connections, then closes every open session.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(ServerError::ServerNotRunning);
        }

        info!("Shutting down board server");

        self.shutdown_notify.notify_one();

        if let Some(handle) = self.accept_handle.lock().await.take() {
            let _ = tokio::time::timeout(self.config.shutdown_timeout, handle).await;
        }

        self.manager.shutdown().await;

        info!("Board server shutdown complete");

        Ok(())
    }

    /// Check if the server is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the server's bind address
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Get the number of active connections
    pub fn connection_count(&self) -> usize {
        self.manager.connection_count()
    }

    /// Current session and reply counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Get the connection manager
    pub fn manager(&self) -> Arc<ConnectionManager> {
        self.manager.clone()
    }

    /// The board every session shares
    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for BoardServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardServer")
            .field("bind_address", &self.bind_address())
            .field("running", &self.is_running())
            .field("connection_count", &self.connection_count())
            .finish()
    }
}

impl Drop for BoardServer {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            warn!("BoardServer dropped while still running");
            self.running.store(false, Ordering::SeqCst);
            self.shutdown_notify.notify_one();
        }
    }
}
