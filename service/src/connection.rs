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

//! A line-framed client connection

use crate::{ConnectionId, Result};
use bboard_protocol::{BoardCodec, Line, Response};
use futures_util::{SinkExt, StreamExt};
use metrics::{counter, gauge, histogram};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, instrument, trace, warn};

/// Per-connection counters shared with the connection manager
#[derive(Debug, Default)]
pub struct ConnectionStats {
    requests_received: AtomicU64,
    responses_sent: AtomicU64,
    bytes_received: AtomicU64,
    bytes_sent: AtomicU64,
}

impl ConnectionStats {
    /// Request lines received
    pub fn requests_received(&self) -> u64 {
        self.requests_received.load(Ordering::Relaxed)
    }

    /// Response lines sent
    pub fn responses_sent(&self) -> u64 {
        self.responses_sent.load(Ordering::Relaxed)
    }

    /// Request bytes received
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    /// Response bytes sent
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }
}

/// A TCP connection speaking the board line protocol
pub struct BoardConnection {
    framed: Framed<TcpStream, BoardCodec>,
    id: ConnectionId,
    peer_addr: SocketAddr,
    created_at: Instant,
    stats: Arc<ConnectionStats>,
}

impl BoardConnection {
    /// Wrap an accepted socket
    #[instrument(skip(socket), fields(connection_id = %id))]
    pub fn wrap(socket: TcpStream, id: ConnectionId, max_line_length: usize) -> Result<Self> {
        let peer_addr = socket.peer_addr()?;
        if let Err(err) = socket.set_nodelay(true) {
            warn!(error = %err, "Failed to set TCP_NODELAY");
        }

        info!(peer_addr = %peer_addr, "Creating new board connection");
        counter!("bboard.connections.total").increment(1);
        gauge!("bboard.connections.active").increment(1.0);

        Ok(Self {
            framed: Framed::new(socket, BoardCodec::with_max_line_length(max_line_length)),
            id,
            peer_addr,
            created_at: Instant::now(),
            stats: Arc::new(ConnectionStats::default()),
        })
    }

    /// Get the connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Get the peer address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Get when the connection was accepted
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Shared counters for this connection
    pub fn stats(&self) -> Arc<ConnectionStats> {
        self.stats.clone()
    }

    /// Write one response line and flush it
    ///
    /// Returns the number of bytes written, including the line terminator.
    #[instrument(skip(self, response), fields(connection_id = %self.id))]
    pub async fn send(&mut self, response: &Response) -> Result<u64> {
        let start = Instant::now();
        let line = response.to_string();
        let bytes = line.len() as u64 + 1;

        self.framed.send(line.as_str()).await?;

        self.stats.responses_sent.fetch_add(1, Ordering::Relaxed);
        self.stats.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
        counter!("bboard.responses.sent").increment(1);
        histogram!("bboard.response.send_duration").record(start.elapsed().as_secs_f64());

        trace!(bytes, "Response sent");
        Ok(bytes)
    }

    /// Receive the next request line
    ///
    /// Returns `Ok(None)` once the peer has closed the stream. A line over
    /// the limit comes back as [`Line::TooLong`] and the stream stays open.
    #[instrument(skip(self), fields(connection_id = %self.id))]
    pub async fn next_line(&mut self) -> Result<Option<Line>> {
        match self.framed.next().await {
            Some(Ok(Line::Text(line))) => {
                self.stats.requests_received.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .bytes_received
                    .fetch_add(line.len() as u64, Ordering::Relaxed);
                counter!("bboard.requests.received").increment(1);
                trace!(line = %line, "Request received");
                Ok(Some(Line::Text(line)))
            }
            Some(Ok(Line::TooLong)) => {
                self.stats.requests_received.fetch_add(1, Ordering::Relaxed);
                counter!("bboard.requests.too_long").increment(1);
                Ok(Some(Line::TooLong))
            }
            Some(Err(err)) => {
                counter!("bboard.errors.receive").increment(1);
                Err(err.into())
            }
            None => {
                debug!("Connection stream ended");
                Ok(None)
            }
        }
    }
}

impl Drop for BoardConnection {
    fn drop(&mut self) {
        gauge!("bboard.connections.active").decrement(1.0);
    }
}

impl std::fmt::Debug for BoardConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardConnection")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("created_at", &self.created_at)
            .finish()
    }
}
