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

//! # Bulletin Board Client
//!
//! Async client for the shared bulletin board line protocol.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bboard_board::NoteQuery;
//! use bboard_client::{BoardClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = BoardClient::connect(ClientConfig::new("localhost", 4554)).await?;
//!     println!("colors: {:?}", client.info().colors);
//!
//!     client.post(0, 0, "red", "Standup moved to 10:30").await?;
//!     client.pin(1, 1).await?;
//!
//!     for note in client.notes(&NoteQuery::new().with_color("red")).await? {
//!         println!("({}, {}) {}", note.x, note.y, note.message);
//!     }
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! Server `ERROR` lines surface as [`ClientError::Server`] from the typed
//! calls; [`BoardClient::request`] returns them as plain responses.

mod client;
mod config;
mod error;

pub use bboard_protocol::{BoardInfo, ErrorCode, NoteView, Response};
pub use client::BoardClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
