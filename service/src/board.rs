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

//! The board shared between sessions
//!
//! A single [`tokio::sync::Mutex`] guards the whole [`Board`]. Every command
//! runs to completion under that lock, so all sessions observe one
//! serializable history and no query can see a half-applied mutation.

use bboard_board::{Board, BoardConfig};
use bboard_protocol::{BoardInfo, Command, NoteView, Response};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Cloneable handle to the one board a server serves
#[derive(Clone)]
pub struct SharedBoard {
    board: Arc<Mutex<Board>>,
    info: Arc<BoardInfo>,
}

impl SharedBoard {
    /// Wrap an existing board
    pub fn new(board: Board) -> Self {
        let info = Arc::new(BoardInfo::from(board.config()));
        Self {
            board: Arc::new(Mutex::new(board)),
            info,
        }
    }

    /// Create an empty board for `config`
    pub fn from_config(config: BoardConfig) -> Self {
        Self::new(Board::new(config))
    }

    /// Geometry and colors, captured once at construction
    pub fn info(&self) -> &BoardInfo {
        &self.info
    }

    /// Run one command against the board and produce its reply
    ///
    /// `DISCONNECT` does not touch the board and always answers `OK`.
    pub async fn execute(&self, command: &Command) -> Response {
        if let Command::Disconnect = command {
            return Response::Ok;
        }

        let mut board = self.board.lock().await;
        let result = match command {
            Command::Disconnect => Ok(()),
            Command::Clear => {
                board.clear();
                Ok(())
            }
            Command::Shake => {
                board.shake();
                Ok(())
            }
            Command::Post {
                x,
                y,
                color,
                message,
            } => board.post(*x, *y, color, message.as_str()),
            Command::Pin { x, y } => board.pin(*x, *y),
            Command::Unpin { x, y } => board.unpin(*x, *y),
            Command::GetPins => return Response::Pins(board.pins().collect()),
            Command::GetNotes(query) => {
                return Response::Notes(board.notes(query).map(NoteView::from).collect());
            }
        };

        match result {
            Ok(()) => Response::Ok,
            Err(err) => {
                debug!(error = %err, "Board rejected command");
                Response::from(err)
            }
        }
    }

    /// Lock the board for direct inspection
    pub async fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().await
    }
}

impl std::fmt::Debug for SharedBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBoard")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
