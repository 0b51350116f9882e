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

//! Board geometry and color configuration

use crate::ConfigError;

/// Immutable board configuration
///
/// Holds the board extent, the fixed note footprint and the set of colors
/// a note may be posted with. Colors keep the order they were supplied in
/// (duplicates dropped) so every session sees the same init line.
///
/// # Example
///
/// ```
/// use bboard_board::BoardConfig;
///
/// let config = BoardConfig::new(200, 100, 20, 10, ["white", "green", "yellow"]).unwrap();
/// assert_eq!(config.colors(), &["white", "green", "yellow"]);
/// assert!(config.is_valid_color("green"));
/// assert!(!config.is_valid_color("Green"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    board_width: u32,
    board_height: u32,
    note_width: u32,
    note_height: u32,
    colors: Vec<String>,
}

impl BoardConfig {
    /// Create and validate a board configuration
    ///
    /// Blank color names are skipped. At least one color must remain.
    pub fn new<I, S>(
        board_width: u32,
        board_height: u32,
        note_width: u32,
        note_height: u32,
        colors: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (value, name) in [
            (board_width, "board_width"),
            (board_height, "board_height"),
            (note_width, "note_width"),
            (note_height, "note_height"),
        ] {
            if value == 0 {
                return Err(ConfigError::NonPositiveDimension(name));
            }
        }

        if note_width > board_width || note_height > board_height {
            return Err(ConfigError::NoteLargerThanBoard {
                board_width,
                board_height,
                note_width,
                note_height,
            });
        }

        let mut unique: Vec<String> = Vec::new();
        for color in colors {
            let color = color.as_ref().trim();
            if color.is_empty() {
                continue;
            }
            if color.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidColor(color.to_string()));
            }
            if !unique.iter().any(|c| c == color) {
                unique.push(color.to_string());
            }
        }
        if unique.is_empty() {
            return Err(ConfigError::NoColors);
        }

        Ok(Self {
            board_width,
            board_height,
            note_width,
            note_height,
            colors: unique,
        })
    }

    /// Board width
    pub fn board_width(&self) -> u32 {
        self.board_width
    }

    /// Board height
    pub fn board_height(&self) -> u32 {
        self.board_height
    }

    /// Width shared by every note
    pub fn note_width(&self) -> u32 {
        self.note_width
    }

    /// Height shared by every note
    pub fn note_height(&self) -> u32 {
        self.note_height
    }

    /// Valid colors in configuration order
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Case-sensitive membership test used by Post
    pub fn is_valid_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}
