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

//! Client error types

use bboard_protocol::{CodecError, ErrorCode, ParseResponseError};
use std::io;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// The server did not accept the connection in time
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// The server did not answer a request in time
    #[error("Response timeout")]
    ResponseTimeout,

    /// Connection closed by server
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// Connection refused
    #[error("Connection refused")]
    ConnectionRefused,

    /// Framing error
    #[error("Codec error: {0}")]
    Codec(CodecError),

    /// A response line could not be parsed
    #[error("Malformed response: {0}")]
    Parse(#[from] ParseResponseError),

    /// A well-formed response of the wrong kind
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The server answered with an `ERROR` line
    #[error("Server error {code}: {message}")]
    Server {
        /// Wire code
        code: ErrorCode,
        /// Server's message
        message: String,
    },

    /// The request cannot be expressed on the wire
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// The server's error code, if this is a server error
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Server { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut => Self::ResponseTimeout,
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe => Self::ConnectionClosed,
            _ => Self::Io(error),
        }
    }
}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Io(err) => err.into(),
            other => Self::Codec(other),
        }
    }
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let err: ClientError = io::Error::from(io::ErrorKind::ConnectionRefused).into();
        assert!(matches!(err, ClientError::ConnectionRefused));

        let err: ClientError = CodecError::Io(io::Error::from(io::ErrorKind::BrokenPipe)).into();
        assert!(matches!(err, ClientError::ConnectionClosed));

        let err: ClientError = io::Error::other("boom").into();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[test]
    fn test_server_error_code() {
        let err = ClientError::Server {
            code: ErrorCode::PinNotFound,
            message: "No pin at given coordinate".into(),
        };
        assert_eq!(err.code(), Some(ErrorCode::PinNotFound));
        assert_eq!(
            err.to_string(),
            "Server error PIN_NOT_FOUND: No pin at given coordinate"
        );
        assert_eq!(ClientError::ConnectionClosed.code(), None);
    }
}
