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

//! Bulletin Board State
//!
//! This crate holds the authoritative model of a shared bulletin board: a
//! fixed-size surface carrying fixed-size sticky notes that clients post,
//! pin, unpin and query. It is deliberately free of I/O and locking so the
//! rules can be tested directly; the service layer wraps a [`Board`] in a
//! single lock and shares it across sessions.
//!
//! # Example
//!
//! ```
//! use bboard_board::{Board, BoardConfig, BoardError, NoteQuery};
//!
//! let config = BoardConfig::new(100, 50, 10, 10, ["red", "blue"]).unwrap();
//! let mut board = Board::new(config);
//!
//! board.post(0, 0, "red", "hello").unwrap();
//! assert_eq!(
//!     board.post(0, 0, "blue", "bye"),
//!     Err(BoardError::CompleteOverlap { x: 0, y: 0 })
//! );
//!
//! board.pin(5, 5).unwrap();
//! assert_eq!(board.pins().collect::<Vec<_>>(), vec![(5, 5)]);
//! assert!(board.notes(&NoteQuery::new()).all(|n| n.is_pinned()));
//! ```

mod board;
mod config;
mod error;
mod note;
mod query;

pub use board::Board;
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult, ConfigError};
pub use note::Note;
pub use query::NoteQuery;
