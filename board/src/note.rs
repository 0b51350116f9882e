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

//! Sticky notes and their footprint geometry

use std::fmt;

/// A sticky note posted on the board
///
/// Anchor, color and message never change after posting. Only the pin
/// counter moves, and only the owning [`Board`](crate::Board) moves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    x: i32,
    y: i32,
    color: String,
    message: String,
    pin_count: u32,
}

impl Note {
    pub(crate) fn new(x: i32, y: i32, color: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            x,
            y,
            color: color.into(),
            message: message.into(),
            pin_count: 0,
        }
    }

    /// Anchor x (left edge)
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Anchor y (top edge)
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Anchor as a pair
    pub fn anchor(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Note color
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Note message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of active pin increments inside this note
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    /// A note is pinned while at least one pin holds it
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    /// Whether the footprint lies fully inside `[0, board_width) x [0, board_height)`
    pub fn fits_in(&self, board_width: u32, board_height: u32, note_width: u32, note_height: u32) -> bool {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x >= 0
            && y >= 0
            && x + i64::from(note_width) <= i64::from(board_width)
            && y + i64::from(note_height) <= i64::from(board_height)
    }

    /// Half-open point test against the footprint
    pub fn contains(&self, px: i32, py: i32, note_width: u32, note_height: u32) -> bool {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let (px, py) = (i64::from(px), i64::from(py));
        px >= x && px < x + i64::from(note_width) && py >= y && py < y + i64::from(note_height)
    }

    pub(crate) fn set_pin_count(&mut self, count: u32) {
        self.pin_count = count;
    }

    pub(crate) fn add_pin(&mut self) {
        self.pin_count = self.pin_count.saturating_add(1);
    }

    pub(crate) fn remove_pin(&mut self) {
        self.pin_count = self.pin_count.saturating_sub(1);
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} note at ({}, {}) pins={}: {}",
            self.color, self.x, self.y, self.pin_count, self.message
        )
    }
}
