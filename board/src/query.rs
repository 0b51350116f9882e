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

//! Note query filters

use crate::Note;

/// Conjunctive filter set for [`Board::notes`](crate::Board::notes)
///
/// An empty query matches every note. Filters are applied in the order
/// color, contains, refers-to.
///
/// # Example
///
/// ```
/// use bboard_board::NoteQuery;
///
/// let query = NoteQuery::new()
///     .with_color("red")
///     .with_contains(5, 5)
///     .with_refers_to("lunch");
/// assert!(!query.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Exact color match, case-insensitive
    pub color: Option<String>,
    /// Point that must fall inside the note footprint
    pub contains: Option<(i32, i32)>,
    /// Case-insensitive substring of the message
    pub refers_to: Option<String>,
}

impl NoteQuery {
    /// Query with no filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep notes of the given color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Keep notes covering the given point
    pub fn with_contains(mut self, x: i32, y: i32) -> Self {
        self.contains = Some((x, y));
        self
    }

    /// Keep notes whose message mentions the given text
    pub fn with_refers_to(mut self, text: impl Into<String>) -> Self {
        self.refers_to = Some(text.into());
        self
    }

    /// True when no filter is set
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.contains.is_none() && self.refers_to.is_none()
    }

    /// Test one note against every filter
    pub fn matches(&self, note: &Note, note_width: u32, note_height: u32) -> bool {
        if let Some(color) = &self.color {
            if note.color().to_lowercase() != color.to_lowercase() {
                return false;
            }
        }
        if let Some((x, y)) = self.contains {
            if !note.contains(x, y, note_width, note_height) {
                return false;
            }
        }
        if let Some(text) = &self.refers_to {
            if !note.message().to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
