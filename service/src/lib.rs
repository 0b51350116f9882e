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

//! Bulletin Board Service
//!
//! An async TCP service that lets any number of clients share one board.
//! Each accepted connection runs as its own task; the board is the only
//! state they share and it sits behind a single lock.
//!
//! # Architecture
//!
//! ```text
//! BoardServer
//!     ↓
//! ConnectionManager
//!     ↓
//! ConnectionWorker → BoardConnection
//!     ↓
//! SessionHandler (BoardHandler) → SharedBoard
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bboard_board::BoardConfig;
//! use bboard_service::{BoardServer, ServerConfig, SharedBoard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BoardConfig::new(200, 100, 20, 10, ["red", "green", "yellow"])?;
//!     let server = BoardServer::new(ServerConfig::default(), SharedBoard::from_config(config)).await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

mod board;
mod config;
mod connection;
mod error;
mod handler;
mod manager;
mod metrics;
mod server;
mod worker;

pub use board::SharedBoard;
pub use config::ServerConfig;
pub use connection::{BoardConnection, ConnectionStats};
pub use error::{Result, ServerError};
pub use handler::{BoardHandler, Reply, SessionHandler};
pub use manager::{ConnectionId, ConnectionManager, SessionInfo};
pub use metrics::{MetricsSnapshot, ServerMetrics};
pub use server::BoardServer;
pub use worker::{ConnectionWorker, ControlMessage, SessionState, WorkerConfig};
