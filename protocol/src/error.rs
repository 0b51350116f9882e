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

//! Error types for the protocol layer

use crate::ErrorCode;
use thiserror::Error;

/// A request line that could not be turned into a [`Command`](crate::Command)
///
/// Carries the wire code and the human-readable text that goes after it
/// on the `ERROR` line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} {message}")]
pub struct ProtocolError {
    /// Wire code
    pub code: ErrorCode,
    /// Human-readable explanation
    pub message: String,
}

impl ProtocolError {
    /// `INVALID_FORMAT` with the given message
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidFormat,
            message: message.into(),
        }
    }

    /// `INVALID_COMMAND` with the given message
    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidCommand,
            message: message.into(),
        }
    }
}

/// Line codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length
    #[error("line exceeds maximum length of {max} bytes")]
    LineTooLong {
        /// Configured limit
        max: usize,
    },
}

/// Errors raised while parsing a response line on the client side
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseResponseError {
    /// The line was empty
    #[error("empty response")]
    Empty,

    /// The first tokens did not name a known response kind
    #[error("unknown response kind: {0}")]
    UnknownKind(String),

    /// A required field was missing
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A numeric field did not parse
    #[error("invalid {field}: {value}")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Offending token
        value: String,
    },

    /// The `ERROR` code is not one this client knows
    #[error("unknown error code: {0}")]
    UnknownErrorCode(String),

    /// A message ended before its declared length
    #[error("message truncated: expected {expected} characters")]
    Truncated {
        /// Declared character count
        expected: usize,
    },

    /// Tokens were left over after the declared records
    #[error("unexpected trailing data: {0}")]
    TrailingData(String),
}
