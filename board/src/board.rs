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

//! The board state machine
//!
//! [`Board`] owns every note and every pin. All mutations go through its
//! methods, which enforce:
//!
//! 1. every note lies fully inside the board,
//! 2. no two notes share an anchor,
//! 3. the pin map never holds a zero count,
//! 4. each note's pin counter equals the pin increments inside its footprint.
//!
//! The board itself is not synchronized. Callers sharing it across tasks
//! wrap it in a single lock so every operation is a critical section.

use crate::{BoardConfig, BoardError, BoardResult, Note, NoteQuery};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Authoritative note and pin state for one board
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    notes: Vec<Note>,
    pins: BTreeMap<(i32, i32), u32>,
}

impl Board {
    /// Create an empty board
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            notes: Vec::new(),
            pins: BTreeMap::new(),
        }
    }

    /// Board configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Number of posted notes
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Number of active pins, counting multiplicity
    pub fn pin_count(&self) -> usize {
        self.pins.values().map(|&count| count as usize).sum()
    }

    /// Post a new note
    ///
    /// Checks run in order: color, bounds, identical anchor. Partial
    /// overlap with other notes is allowed.
    pub fn post(
        &mut self,
        x: i32,
        y: i32,
        color: &str,
        message: impl Into<String>,
    ) -> BoardResult<()> {
        if !self.config.is_valid_color(color) {
            return Err(BoardError::ColorNotSupported(color.to_string()));
        }

        let mut note = Note::new(x, y, color, message);
        if !note.fits_in(
            self.config.board_width(),
            self.config.board_height(),
            self.config.note_width(),
            self.config.note_height(),
        ) {
            return Err(BoardError::OutOfBounds { x, y });
        }

        if self.notes.iter().any(|existing| existing.anchor() == (x, y)) {
            return Err(BoardError::CompleteOverlap { x, y });
        }

        // Pins already inside the new footprint hold it as well.
        let (nw, nh) = self.note_size();
        let covering: u32 = self
            .pins
            .iter()
            .filter(|(point, _)| note.contains(point.0, point.1, nw, nh))
            .fold(0u32, |acc, (_, &count)| acc.saturating_add(count));
        note.set_pin_count(covering);

        debug!(x, y, color, "Note posted");
        self.notes.push(note);
        Ok(())
    }

    /// Pin every note covering `(x, y)`
    pub fn pin(&mut self, x: i32, y: i32) -> BoardResult<()> {
        let (nw, nh) = self.note_size();
        let mut found = 0usize;
        for note in self.notes.iter_mut().filter(|n| n.contains(x, y, nw, nh)) {
            note.add_pin();
            found += 1;
        }
        if found == 0 {
            return Err(BoardError::NoNoteAtCoordinate { x, y });
        }

        let count = self.pins.entry((x, y)).or_insert(0);
        *count = count.saturating_add(1);
        trace!(x, y, notes = found, multiplicity = *count, "Pinned");
        Ok(())
    }

    /// Remove one pin at `(x, y)`
    pub fn unpin(&mut self, x: i32, y: i32) -> BoardResult<()> {
        match self.pins.get(&(x, y)).copied().unwrap_or(0) {
            0 => return Err(BoardError::PinNotFound { x, y }),
            1 => {
                self.pins.remove(&(x, y));
            }
            count => {
                self.pins.insert((x, y), count - 1);
            }
        }

        let (nw, nh) = self.note_size();
        for note in self.notes.iter_mut().filter(|n| n.contains(x, y, nw, nh)) {
            note.remove_pin();
        }
        trace!(x, y, "Unpinned");
        Ok(())
    }

    /// Remove all notes and all pins
    pub fn clear(&mut self) {
        debug!(notes = self.notes.len(), pins = self.pins.len(), "Board cleared");
        self.notes.clear();
        self.pins.clear();
    }

    /// Remove every unpinned note, leaving pins untouched
    pub fn shake(&mut self) {
        let before = self.notes.len();
        self.notes.retain(Note::is_pinned);
        debug!(removed = before - self.notes.len(), "Board shaken");
    }

    /// Notes matching `query`, in posting order
    ///
    /// The iterator borrows the board and has no side effects; calling
    /// this again yields the same sequence.
    pub fn notes<'a>(&'a self, query: &'a NoteQuery) -> impl Iterator<Item = &'a Note> + 'a {
        let (nw, nh) = self.note_size();
        self.notes
            .iter()
            .filter(move |note| query.matches(note, nw, nh))
    }

    /// Pin coordinates ascending by `x` then `y`, repeated per multiplicity
    pub fn pins(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.pins
            .iter()
            .flat_map(|(&point, &count)| std::iter::repeat_n(point, count as usize))
    }

    fn note_size(&self) -> (u32, u32) {
        (self.config.note_width(), self.config.note_height())
    }
}
