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

//! Wire error codes

use bboard_board::BoardError;
use std::fmt;
use std::str::FromStr;

/// Error code carried by an `ERROR` response line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed command shape, arity or integer
    InvalidFormat,
    /// Unknown command verb
    InvalidCommand,
    /// Color not in the board's valid set
    ColorNotSupported,
    /// Note footprint would leave the board
    OutOfBounds,
    /// Another note has the same anchor
    CompleteOverlap,
    /// Pin point not covered by any note
    NoNoteAtCoordinate,
    /// No pin at the coordinate
    PinNotFound,
}

impl ErrorCode {
    /// Every code, in wire documentation order
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::InvalidFormat,
        ErrorCode::InvalidCommand,
        ErrorCode::ColorNotSupported,
        ErrorCode::OutOfBounds,
        ErrorCode::CompleteOverlap,
        ErrorCode::NoNoteAtCoordinate,
        ErrorCode::PinNotFound,
    ];

    /// Wire spelling of the code
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidCommand => "INVALID_COMMAND",
            ErrorCode::ColorNotSupported => "COLOR_NOT_SUPPORTED",
            ErrorCode::OutOfBounds => "OUT_OF_BOUNDS",
            ErrorCode::CompleteOverlap => "COMPLETE_OVERLAP",
            ErrorCode::NoNoteAtCoordinate => "NO_NOTE_AT_COORDINATE",
            ErrorCode::PinNotFound => "PIN_NOT_FOUND",
        }
    }

    /// True for codes produced by the board rather than the parser
    pub fn is_domain_error(self) -> bool {
        !matches!(self, ErrorCode::InvalidFormat | ErrorCode::InvalidCommand)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl From<&BoardError> for ErrorCode {
    fn from(error: &BoardError) -> Self {
        match error {
            BoardError::ColorNotSupported(_) => ErrorCode::ColorNotSupported,
            BoardError::OutOfBounds { .. } => ErrorCode::OutOfBounds,
            BoardError::CompleteOverlap { .. } => ErrorCode::CompleteOverlap,
            BoardError::NoNoteAtCoordinate { .. } => ErrorCode::NoNoteAtCoordinate,
            BoardError::PinNotFound { .. } => ErrorCode::PinNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_spelling_round_trips() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(code));
        }
        assert!("invalid_format".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_board_errors_map_one_to_one() {
        let cases = [
            (BoardError::ColorNotSupported("x".into()), "COLOR_NOT_SUPPORTED"),
            (BoardError::OutOfBounds { x: 0, y: 0 }, "OUT_OF_BOUNDS"),
            (BoardError::CompleteOverlap { x: 0, y: 0 }, "COMPLETE_OVERLAP"),
            (BoardError::NoNoteAtCoordinate { x: 0, y: 0 }, "NO_NOTE_AT_COORDINATE"),
            (BoardError::PinNotFound { x: 0, y: 0 }, "PIN_NOT_FOUND"),
        ];
        for (error, expected) in cases {
            let code = ErrorCode::from(&error);
            assert_eq!(code.as_str(), expected);
            assert!(code.is_domain_error());
        }
        assert!(!ErrorCode::InvalidFormat.is_domain_error());
    }
}
