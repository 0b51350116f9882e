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

//! Connection manager
//!
//! Hands out [`ConnectionId`]s, spawns one worker per accepted socket and
//! keeps the handles needed to report on or close each session.

use crate::{
    BoardConnection, ConnectionStats, ControlMessage, Result, ServerConfig, ServerError,
    ServerMetrics, SessionHandler, SessionState, WorkerConfig,
};
use dashmap::DashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Identifies one client session for the life of the server
///
/// Ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// What the manager knows about a live session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: ConnectionId,
    pub state: SessionState,
    pub peer_addr: SocketAddr,
    /// Time since the socket was accepted
    pub connected_for: Duration,
    /// Request lines read so far
    pub requests: u64,
    /// Reply lines written so far, the init line included
    pub replies: u64,
}

struct ManagedConnection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    stats: Arc<ConnectionStats>,
    control_tx: mpsc::Sender<ControlMessage>,
    worker_handle: JoinHandle<()>,
    state: Arc<AtomicU8>,
    accepted_at: Instant,
}

impl ManagedConnection {
    fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            state: SessionState::from_u8(self.state.load(Ordering::Acquire)),
            peer_addr: self.peer_addr,
            connected_for: self.accepted_at.elapsed(),
            requests: self.stats.requests_received(),
            replies: self.stats.responses_sent(),
        }
    }
}

/// Tracks every open session
pub struct ConnectionManager {
    connections: Arc<DashMap<ConnectionId, ManagedConnection>>,
    next_id: AtomicU64,
    max_connections: usize,
    metrics: Arc<ServerMetrics>,
    worker_config: WorkerConfig,
    /// How long to wait for a worker to finish after asking it to close
    close_timeout: Duration,
}

impl ConnectionManager {
    /// Create a manager enforcing the limits and deadlines in `config`
    pub fn new(config: &ServerConfig, metrics: Arc<ServerMetrics>) -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
            max_connections: config.max_connections,
            metrics,
            worker_config: WorkerConfig::from(config),
            close_timeout: config.shutdown_timeout,
        }
    }

    fn next_connection_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Take ownership of an accepted socket and start its session
    ///
    /// Fails with [`ServerError::MaxConnectionsReached`] when the session
    /// limit is already met; the socket is dropped unanswered.
    pub fn add_connection(
        &self,
        socket: TcpStream,
        handler: Arc<dyn SessionHandler>,
    ) -> Result<ConnectionId> {
        if self.connections.len() >= self.max_connections {
            return Err(ServerError::MaxConnectionsReached(self.max_connections));
        }

        let id = self.next_connection_id();
        let connection = BoardConnection::wrap(socket, id, self.worker_config.max_line_length)?;
        let peer_addr = connection.peer_addr();
        let stats = connection.stats();

        let state = Arc::new(AtomicU8::new(SessionState::Greeting.as_u8()));
        let (worker, control_tx) = crate::ConnectionWorker::new(
            connection,
            handler,
            self.metrics.clone(),
            self.worker_config.clone(),
            state.clone(),
        );

        // The worker waits until its entry is registered so its own removal
        // cannot race ahead of the insert.
        let (registered_tx, registered_rx) = oneshot::channel::<()>();
        let connections = self.connections.clone();
        let metrics = self.metrics.clone();
        let worker_handle = tokio::spawn(async move {
            let start = Instant::now();
            if registered_rx.await.is_ok() {
                worker.run().await;
            }
            connections.remove(&id);
            metrics.session_closed(start.elapsed());
        });

        self.connections.insert(
            id,
            ManagedConnection {
                id,
                peer_addr,
                stats,
                control_tx,
                worker_handle,
                state,
                accepted_at: Instant::now(),
            },
        );
        self.metrics.session_opened();
        let _ = registered_tx.send(());

        debug!(connection_id = %id, peer_addr = %peer_addr, "Connection registered");
        Ok(id)
    }

    /// Close one session and wait for its worker to finish
    pub async fn remove_connection(&self, id: ConnectionId) -> Result<()> {
        let (_, managed) = self
            .connections
            .remove(&id)
            .ok_or(ServerError::ConnectionNotFound(id))?;
        self.close(managed).await;
        Ok(())
    }

    async fn close(&self, managed: ManagedConnection) {
        let ManagedConnection {
            id,
            control_tx,
            mut worker_handle,
            ..
        } = managed;

        // Best effort; a finished worker has already dropped its receiver
        let _ = control_tx.send(ControlMessage::Close).await;

        if tokio::time::timeout(self.close_timeout, &mut worker_handle)
            .await
            .is_err()
        {
            warn!(connection_id = %id, "Worker did not stop in time, aborting");
            worker_handle.abort();
        }
    }

    /// Look up one live session
    pub fn session_info(&self, id: ConnectionId) -> Option<SessionInfo> {
        self.connections.get(&id).map(|entry| entry.info())
    }

    /// Every live session, in no particular order
    pub fn sessions(&self) -> Vec<SessionInfo> {
        self.connections
            .iter()
            .map(|entry| entry.value().info())
            .collect()
    }

    /// Number of live sessions
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Close every session, waiting up to the close timeout for each
    pub async fn shutdown(&self) {
        let ids: Vec<ConnectionId> = self.connections.iter().map(|entry| *entry.key()).collect();
        debug!(count = ids.len(), "Closing all connections");

        let closing: Vec<_> = ids
            .into_iter()
            .filter_map(|id| self.connections.remove(&id).map(|(_, managed)| managed))
            .map(|managed| self.close(managed))
            .collect();
        futures_util::future::join_all(closing).await;
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connection_count", &self.connection_count())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}
