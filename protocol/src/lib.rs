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

//! Bulletin Board Line Protocol
//!
//! Requests and responses are single lines of UTF-8 text terminated by
//! `\n`. This crate owns everything between the socket and the board:
//!
//! - [`Command`] parses request lines into typed commands.
//! - [`Response`] formats (and, for clients, parses) response lines.
//! - [`ErrorCode`] is the closed set of codes that appear after `ERROR`.
//! - [`BoardCodec`] frames a byte stream into lines for `tokio_util::codec::Framed`.
//!
//! # Example
//!
//! ```
//! use bboard_protocol::{Command, Response};
//!
//! let command = Command::parse("post 10 20 red Hello there").unwrap();
//! assert_eq!(command.to_string(), "POST 10 20 red Hello there");
//!
//! let response = Response::parse("DATA PINS 2 5 5 5 5").unwrap();
//! assert_eq!(response, Response::Pins(vec![(5, 5), (5, 5)]));
//! ```

mod code;
mod codec;
mod command;
mod error;
mod response;

pub use code::ErrorCode;
pub use codec::{BoardCodec, DEFAULT_MAX_LINE_LENGTH, Line};
pub use command::Command;
pub use error::{CodecError, ParseResponseError, ProtocolError};
pub use response::{BoardInfo, NoteView, Response};
