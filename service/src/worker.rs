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

//! Connection worker
//!
//! A worker owns one [`BoardConnection`] and drives its session: send the
//! greeting, then read a line, hand it to the [`SessionHandler`] and write
//! the reply. It stops when the peer leaves, the handler ends the session,
//! a deadline expires or the manager sends [`ControlMessage::Close`].

use crate::{BoardConnection, ConnectionId, Result, ServerError, ServerMetrics, SessionHandler};
use bboard_protocol::{ErrorCode, Line, Response};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, instrument, warn};

/// Where a session is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Accepted, init line not yet written
    Greeting,
    /// Reading requests
    Serving,
    /// Tearing down
    Closing,
    /// Worker has finished
    Closed,
}

impl SessionState {
    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Greeting,
            1 => SessionState::Serving,
            2 => SessionState::Closing,
            _ => SessionState::Closed,
        }
    }
}

/// Control messages for the worker
#[derive(Debug)]
pub enum ControlMessage {
    /// Stop reading and end the session
    Close,
}

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Close the session after this long without a request; `None` never does
    pub idle_timeout: Option<Duration>,
    /// Max time to write one response line
    pub write_timeout: Duration,
    /// Longest accepted request line in bytes
    pub max_line_length: usize,
    /// Control channel buffer size
    pub control_buffer_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: None,
            write_timeout: Duration::from_secs(10),
            max_line_length: bboard_protocol::DEFAULT_MAX_LINE_LENGTH,
            control_buffer_size: 8,
        }
    }
}

impl From<&crate::ServerConfig> for WorkerConfig {
    fn from(config: &crate::ServerConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout,
            write_timeout: config.write_timeout,
            max_line_length: config.max_line_length,
            ..Default::default()
        }
    }
}

/// Read one request line, giving up at `deadline` if there is one
async fn read_request(
    connection: &mut BoardConnection,
    deadline: Option<Instant>,
) -> Result<Option<Line>> {
    match deadline {
        Some(deadline) => timeout_at(deadline, connection.next_line())
            .await
            .map_err(|_| ServerError::Timeout)?,
        None => connection.next_line().await,
    }
}

/// Drives a single session
pub struct ConnectionWorker {
    id: ConnectionId,
    connection: BoardConnection,
    handler: Arc<dyn SessionHandler>,
    metrics: Arc<ServerMetrics>,
    config: WorkerConfig,
    state: Arc<AtomicU8>,
    control_rx: mpsc::Receiver<ControlMessage>,
    last_activity: Instant,
}

impl ConnectionWorker {
    /// Create a worker and the sender used to control it
    ///
    /// `state` is written as the session moves through [`SessionState`] so
    /// the manager can report it without talking to the task.
    pub fn new(
        connection: BoardConnection,
        handler: Arc<dyn SessionHandler>,
        metrics: Arc<ServerMetrics>,
        config: WorkerConfig,
        state: Arc<AtomicU8>,
    ) -> (Self, mpsc::Sender<ControlMessage>) {
        let (control_tx, control_rx) = mpsc::channel(config.control_buffer_size.max(1));
        state.store(SessionState::Greeting.as_u8(), Ordering::Release);

        let worker = Self {
            id: connection.id(),
            connection,
            handler,
            metrics,
            config,
            state,
            control_rx,
            last_activity: Instant::now(),
        };

        (worker, control_tx)
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, new_state: SessionState) {
        self.state.store(new_state.as_u8(), Ordering::Release);
    }

    /// Run the session to completion
    #[instrument(skip(self), fields(connection_id = %self.id))]
    pub async fn run(mut self) {
        let mut result = self.greet().await;
        if result.is_ok() {
            self.set_state(SessionState::Serving);
            result = self.event_loop().await;
        }

        if let Err(err) = result {
            match &err {
                ServerError::Timeout => self.metrics.timeout(),
                _ => self.metrics.transport_error(),
            }
            self.handler.on_error(self.id, &err).await;
        }

        self.cleanup().await;
    }

    async fn greet(&mut self) -> Result<()> {
        let greeting = self
            .handler
            .on_connect(self.id, self.connection.peer_addr())
            .await;
        match greeting {
            Some(response) => self.send(&response).await,
            None => Ok(()),
        }
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            let deadline = self.config.idle_timeout.map(|idle| self.last_activity + idle);

            select! {
                request = read_request(&mut self.connection, deadline) => {
                    let line = match request {
                        Ok(Some(line)) => line,
                        Ok(None) => return Ok(()),
                        Err(ServerError::Timeout) => {
                            debug!(idle = ?self.last_activity.elapsed(), "Session idle, closing");
                            return Err(ServerError::Timeout);
                        }
                        Err(err) => return Err(err),
                    };
                    self.last_activity = Instant::now();
                    self.metrics.request_received();

                    match line {
                        Line::Text(line) => {
                            let reply = self.handler.on_request(self.id, &line).await;
                            self.send(&reply.response).await?;
                            if reply.close {
                                debug!("Session closed by request");
                                return Ok(());
                            }
                        }
                        Line::TooLong => {
                            let max = self.config.max_line_length;
                            debug!(max, "Discarded oversized request line");
                            self.metrics.line_too_long();
                            let notice = Response::error(
                                ErrorCode::InvalidFormat,
                                format!("Line exceeds {max} bytes"),
                            );
                            self.send(&notice).await?;
                        }
                    }
                }

                msg = self.control_rx.recv() => {
                    match msg {
                        Some(ControlMessage::Close) | None => {
                            debug!("Close requested");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    async fn send(&mut self, response: &Response) -> Result<()> {
        match timeout(self.config.write_timeout, self.connection.send(response)).await {
            Ok(Ok(_)) => {
                self.metrics.reply_sent(response);
                Ok(())
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                warn!("Write timed out");
                Err(ServerError::Timeout)
            }
        }
    }

    async fn cleanup(&mut self) {
        self.set_state(SessionState::Closing);
        self.handler.on_disconnect(self.id).await;

        while self.control_rx.try_recv().is_ok() {}

        self.set_state(SessionState::Closed);
    }
}

impl std::fmt::Debug for ConnectionWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionWorker")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("last_activity", &self.last_activity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reply;
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    struct TestHandler {
        requests: AtomicUsize,
        errored: AtomicBool,
        disconnected: AtomicBool,
    }

    impl TestHandler {
        fn new() -> Self {
            Self {
                requests: AtomicUsize::new(0),
                errored: AtomicBool::new(false),
                disconnected: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl SessionHandler for TestHandler {
        async fn on_connect(&self, _id: ConnectionId, _peer: SocketAddr) -> Option<Response> {
            Some(Response::Ok)
        }

        async fn on_request(&self, _id: ConnectionId, line: &str) -> Reply {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if line == "BYE" {
                Reply::close(Response::Ok)
            } else {
                Reply::respond(Response::Pins(vec![(1, 1)]))
            }
        }

        async fn on_error(&self, _id: ConnectionId, _error: &ServerError) {
            self.errored.store(true, Ordering::SeqCst);
        }

        async fn on_disconnect(&self, _id: ConnectionId) {
            self.disconnected.store(true, Ordering::SeqCst);
        }
    }

    struct Spawned {
        handler: Arc<TestHandler>,
        metrics: Arc<ServerMetrics>,
        state: Arc<AtomicU8>,
        control_tx: mpsc::Sender<ControlMessage>,
        task: tokio::task::JoinHandle<()>,
        client: TcpStream,
    }

    async fn spawn_worker(config: WorkerConfig) -> Spawned {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();

        let connection =
            BoardConnection::wrap(server, ConnectionId::new(1), config.max_line_length).unwrap();
        let handler = Arc::new(TestHandler::new());
        let metrics = Arc::new(ServerMetrics::new());
        let state = Arc::new(AtomicU8::new(0));
        let (worker, control_tx) = ConnectionWorker::new(
            connection,
            handler.clone(),
            metrics.clone(),
            config,
            state.clone(),
        );
        let task = tokio::spawn(worker.run());
        Spawned {
            handler,
            metrics,
            state,
            control_tx,
            task,
            client,
        }
    }

    #[test]
    fn test_session_state_encoding() {
        for state in [
            SessionState::Greeting,
            SessionState::Serving,
            SessionState::Closing,
            SessionState::Closed,
        ] {
            assert_eq!(SessionState::from_u8(state.as_u8()), state);
        }
        assert_eq!(SessionState::from_u8(200), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_worker_request_reply_and_close() {
        let spawned = spawn_worker(WorkerConfig::default()).await;
        let (read, mut write) = spawned.client.into_split();
        let mut lines = BufReader::new(read).lines();

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("OK"));
        write.write_all(b"anything\nBYE\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("DATA PINS 1 1 1"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("OK"));
        assert_eq!(lines.next_line().await.unwrap(), None);

        spawned.task.await.unwrap();
        assert_eq!(spawned.handler.requests.load(Ordering::SeqCst), 2);
        assert!(spawned.handler.disconnected.load(Ordering::SeqCst));
        assert!(!spawned.handler.errored.load(Ordering::SeqCst));
        assert_eq!(
            SessionState::from_u8(spawned.state.load(Ordering::SeqCst)),
            SessionState::Closed
        );
        assert_eq!(spawned.metrics.snapshot().replies, 3);
    }

    #[tokio::test]
    async fn test_worker_control_close() {
        let spawned = spawn_worker(WorkerConfig::default()).await;

        spawned.control_tx.send(ControlMessage::Close).await.unwrap();
        spawned.task.await.unwrap();

        assert!(spawned.handler.disconnected.load(Ordering::SeqCst));
        assert!(!spawned.handler.errored.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_worker_idle_timeout() {
        let config = WorkerConfig {
            idle_timeout: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let spawned = spawn_worker(config).await;

        tokio::time::timeout(Duration::from_secs(5), spawned.task)
            .await
            .unwrap()
            .unwrap();
        assert!(spawned.handler.errored.load(Ordering::SeqCst));
        assert!(spawned.handler.disconnected.load(Ordering::SeqCst));
        assert_eq!(spawned.metrics.snapshot().timeouts, 1);
    }

    #[tokio::test]
    async fn test_worker_without_idle_timeout_stays_open() {
        let spawned = spawn_worker(WorkerConfig::default()).await;
        let (read, mut write) = spawned.client.into_split();
        let mut lines = BufReader::new(read).lines();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("OK"));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!spawned.task.is_finished());

        write.write_all(b"still here\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("DATA PINS 1 1 1"));
        assert!(!spawned.handler.errored.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_worker_answers_long_line_and_keeps_serving() {
        let config = WorkerConfig {
            max_line_length: 16,
            ..Default::default()
        };
        let spawned = spawn_worker(config).await;
        let (read, mut write) = spawned.client.into_split();
        let mut lines = BufReader::new(read).lines();

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("OK"));
        write.write_all(&[b'x'; 64]).await.unwrap();
        write.write_all(b"\nnext\n").await.unwrap();

        let notice = lines.next_line().await.unwrap().unwrap();
        assert_eq!(notice, "ERROR INVALID_FORMAT Line exceeds 16 bytes");
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("DATA PINS 1 1 1"));

        write.write_all(b"BYE\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("OK"));
        spawned.task.await.unwrap();

        assert!(!spawned.handler.errored.load(Ordering::SeqCst));
        assert_eq!(spawned.handler.requests.load(Ordering::SeqCst), 2);
        let snapshot = spawned.metrics.snapshot();
        assert_eq!(snapshot.oversized_lines, 1);
        assert_eq!(snapshot.request_errors, 1);
    }
}
