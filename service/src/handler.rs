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

//! Session handler trait and the board implementation

use crate::{ConnectionId, ServerError, SharedBoard};
use async_trait::async_trait;
use bboard_protocol::{Command, Response};
use metrics::counter;
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// What a worker should do after a request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The single line to send back
    pub response: Response,
    /// End the session once the line is written
    pub close: bool,
}

impl Reply {
    /// Send `response` and keep reading
    pub fn respond(response: Response) -> Self {
        Self {
            response,
            close: false,
        }
    }

    /// Send `response` and end the session
    pub fn close(response: Response) -> Self {
        Self {
            response,
            close: true,
        }
    }
}

/// Server session handler trait
///
/// Called by each connection worker. Every request line receives exactly
/// one [`Reply`]; the worker writes it before reading the next line.
///
/// # Example
///
/// ```no_run
/// use bboard_service::{ConnectionId, Reply, SessionHandler};
/// use bboard_protocol::Response;
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl SessionHandler for Echo {
///     async fn on_request(&self, _id: ConnectionId, line: &str) -> Reply {
///         Reply::respond(Response::error(bboard_protocol::ErrorCode::InvalidCommand, line))
///     }
/// }
/// ```
#[async_trait]
pub trait SessionHandler: Send + Sync + 'static {
    /// Called once a connection is accepted
    ///
    /// The returned line, if any, is sent before the first request is read.
    async fn on_connect(&self, _id: ConnectionId, _peer_addr: SocketAddr) -> Option<Response> {
        None
    }

    /// Called for every request line
    async fn on_request(&self, id: ConnectionId, line: &str) -> Reply;

    /// Called when a session ends because of an error
    async fn on_error(&self, _id: ConnectionId, _error: &ServerError) {}

    /// Called when the session is over, for any reason
    async fn on_disconnect(&self, _id: ConnectionId) {}
}

/// Parses request lines and runs them against a [`SharedBoard`]
#[derive(Debug, Clone)]
pub struct BoardHandler {
    board: SharedBoard,
}

impl BoardHandler {
    /// Create a handler serving `board`
    pub fn new(board: SharedBoard) -> Self {
        Self { board }
    }

    /// The board this handler serves
    pub fn board(&self) -> &SharedBoard {
        &self.board
    }
}

#[async_trait]
impl SessionHandler for BoardHandler {
    async fn on_connect(&self, id: ConnectionId, peer_addr: SocketAddr) -> Option<Response> {
        info!(connection_id = %id, peer_addr = %peer_addr, "Session started");
        Some(Response::Init(self.board.info().clone()))
    }

    async fn on_request(&self, id: ConnectionId, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                debug!(connection_id = %id, error = %err, "Rejected request");
                counter!("bboard.requests.rejected", "code" => err.code.as_str()).increment(1);
                return Reply::respond(Response::from(err));
            }
        };

        counter!("bboard.requests", "command" => command.verb()).increment(1);
        let response = self.board.execute(&command).await;
        if command.is_disconnect() {
            Reply::close(response)
        } else {
            Reply::respond(response)
        }
    }

    async fn on_error(&self, id: ConnectionId, error: &ServerError) {
        warn!(connection_id = %id, error = %error, "Session ended with error");
    }

    async fn on_disconnect(&self, id: ConnectionId) {
        info!(connection_id = %id, "Session ended");
    }
}
