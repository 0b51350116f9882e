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

//! Error types for board operations

use thiserror::Error;

/// Result type for board operations
pub type BoardResult<T> = std::result::Result<T, BoardError>;

/// Domain errors raised by [`Board`](crate::Board) operations
///
/// Every variant leaves the board unchanged. The session layer maps each
/// variant onto exactly one wire error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The requested color is not one of the board's valid colors
    #[error("Unsupported color")]
    ColorNotSupported(String),

    /// The note footprint would extend past the board edge
    #[error("Note out of bounds")]
    OutOfBounds {
        /// Requested anchor x
        x: i32,
        /// Requested anchor y
        y: i32,
    },

    /// Another note already occupies the identical anchor
    #[error("Cannot completely overlap existing note")]
    CompleteOverlap {
        /// Occupied anchor x
        x: i32,
        /// Occupied anchor y
        y: i32,
    },

    /// No note footprint covers the pin point
    #[error("No note at given coordinate")]
    NoNoteAtCoordinate {
        /// Pin point x
        x: i32,
        /// Pin point y
        y: i32,
    },

    /// No active pin exists at the coordinate
    #[error("No pin at given coordinate")]
    PinNotFound {
        /// Pin point x
        x: i32,
        /// Pin point y
        y: i32,
    },
}

/// Errors raised while validating a [`BoardConfig`](crate::BoardConfig)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A board or note dimension was zero
    #[error("{0} must be > 0")]
    NonPositiveDimension(&'static str),

    /// The note footprint is larger than the board
    #[error("note size {note_width}x{note_height} does not fit on a {board_width}x{board_height} board")]
    NoteLargerThanBoard {
        /// Board width
        board_width: u32,
        /// Board height
        board_height: u32,
        /// Note width
        note_width: u32,
        /// Note height
        note_height: u32,
    },

    /// No usable color was supplied
    #[error("At least one color must be provided")]
    NoColors,

    /// A color name contained whitespace and cannot travel on the wire
    #[error("color '{0}' must be a single token")]
    InvalidColor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_matches_wire_messages() {
        assert_eq!(
            BoardError::ColorNotSupported("pink".into()).to_string(),
            "Unsupported color"
        );
        assert_eq!(
            BoardError::OutOfBounds { x: 95, y: 45 }.to_string(),
            "Note out of bounds"
        );
        assert_eq!(
            BoardError::PinNotFound { x: 1, y: 1 }.to_string(),
            "No pin at given coordinate"
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::NonPositiveDimension("board_width").to_string(),
            "board_width must be > 0"
        );
        assert_eq!(
            ConfigError::NoColors.to_string(),
            "At least one color must be provided"
        );
    }
}
