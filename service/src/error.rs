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

//! Error types for the board service

use crate::ConnectionId;
use bboard_protocol::CodecError;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Service error types
///
/// None of these ever reach the board. Request-level failures are answered
/// with `ERROR` lines by the session handler and never become a `ServerError`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error from the listener or a socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing error from the line codec
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// No session with this id is tracked
    #[error("Connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    /// Idle or write deadline expired
    #[error("Operation timed out")]
    Timeout,

    /// `shutdown` was called on a stopped server
    #[error("Server not running")]
    ServerNotRunning,

    /// `start` was called on a running server
    #[error("Server already running")]
    AlreadyRunning,

    /// The session limit is reached; the socket was turned away
    #[error("Maximum connections ({0}) reached")]
    MaxConnectionsReached(usize),

    /// Server configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
