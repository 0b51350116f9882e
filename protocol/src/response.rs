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

//! Response formatting and parsing
//!
//! Every response is a single line. The server side only formats; the
//! parser exists for clients, and reconstructs note messages exactly by
//! using the declared character count instead of re-joining tokens.

use crate::{ErrorCode, ParseResponseError, ProtocolError};
use bboard_board::{BoardConfig, BoardError, Note};
use std::fmt;

/// Board geometry and colors announced in the init line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInfo {
    /// Board width
    pub board_width: u32,
    /// Board height
    pub board_height: u32,
    /// Note width
    pub note_width: u32,
    /// Note height
    pub note_height: u32,
    /// Valid colors
    pub colors: Vec<String>,
}

impl From<&BoardConfig> for BoardInfo {
    fn from(config: &BoardConfig) -> Self {
        Self {
            board_width: config.board_width(),
            board_height: config.board_height(),
            note_width: config.note_width(),
            note_height: config.note_height(),
            colors: config.colors().to_vec(),
        }
    }
}

/// A note as it appears in a `DATA NOTES` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    /// Anchor x
    pub x: i32,
    /// Anchor y
    pub y: i32,
    /// Color
    pub color: String,
    /// Whether at least one pin holds the note
    pub pinned: bool,
    /// Message
    pub message: String,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            x: note.x(),
            y: note.y(),
            color: note.color().to_string(),
            pinned: note.is_pinned(),
            message: note.message().to_string(),
        }
    }
}

/// A single response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `DATA INIT ...`, sent once when a session starts
    Init(BoardInfo),
    /// `OK`
    Ok,
    /// `ERROR <CODE> <message>`
    Error {
        /// Wire code
        code: ErrorCode,
        /// Message, never containing line breaks
        message: String,
    },
    /// `DATA NOTES <k> ...`
    Notes(Vec<NoteView>),
    /// `DATA PINS <k> ...`
    Pins(Vec<(i32, i32)>),
}

impl Response {
    /// Build an error response, replacing CR and LF with spaces
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Response::Error {
            code,
            message: message.replace(['\r', '\n'], " "),
        }
    }

    /// Whether this is an `ERROR` line
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    /// Parse a response line received from a server
    ///
    /// # Example
    ///
    /// ```
    /// use bboard_protocol::{NoteView, Response};
    ///
    /// let response = Response::parse("DATA NOTES 1 0 0 red 1 9 buy  milk").unwrap();
    /// assert_eq!(
    ///     response,
    ///     Response::Notes(vec![NoteView {
    ///         x: 0,
    ///         y: 0,
    ///         color: "red".into(),
    ///         pinned: true,
    ///         message: "buy  milk".into(),
    ///     }])
    /// );
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseResponseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut cursor = Cursor::new(line);

        match cursor.token() {
            None => Err(ParseResponseError::Empty),
            Some("OK") => {
                cursor.finish()?;
                Ok(Response::Ok)
            }
            Some("ERROR") => {
                let code = cursor.required("code")?;
                let code = code
                    .parse()
                    .map_err(ParseResponseError::UnknownErrorCode)?;
                Ok(Response::Error {
                    code,
                    message: cursor.rest().to_string(),
                })
            }
            Some("DATA") => match cursor.token() {
                Some("INIT") => parse_init(&mut cursor),
                Some("NOTES") => parse_notes(&mut cursor),
                Some("PINS") => parse_pins(&mut cursor),
                Some(other) => Err(ParseResponseError::UnknownKind(format!("DATA {other}"))),
                None => Err(ParseResponseError::MissingField("data kind")),
            },
            Some(other) => Err(ParseResponseError::UnknownKind(other.to_string())),
        }
    }
}

fn parse_init(cursor: &mut Cursor<'_>) -> Result<Response, ParseResponseError> {
    let board_width = cursor.number("board width")?;
    let board_height = cursor.number("board height")?;
    let note_width = cursor.number("note width")?;
    let note_height = cursor.number("note height")?;
    let count: usize = cursor.number("color count")?;
    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        colors.push(cursor.required("color")?.to_string());
    }
    cursor.finish()?;
    Ok(Response::Init(BoardInfo {
        board_width,
        board_height,
        note_width,
        note_height,
        colors,
    }))
}

fn parse_notes(cursor: &mut Cursor<'_>) -> Result<Response, ParseResponseError> {
    let count: usize = cursor.number("note count")?;
    let mut notes = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let x = cursor.number("note x")?;
        let y = cursor.number("note y")?;
        let color = cursor.required("note color")?.to_string();
        let pinned: u8 = cursor.number("pinned flag")?;
        let length: usize = cursor.number("message length")?;
        let message = cursor.chars(length)?.to_string();
        notes.push(NoteView {
            x,
            y,
            color,
            pinned: pinned != 0,
            message,
        });
    }
    cursor.finish()?;
    Ok(Response::Notes(notes))
}

fn parse_pins(cursor: &mut Cursor<'_>) -> Result<Response, ParseResponseError> {
    let count: usize = cursor.number("pin count")?;
    let mut pins = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        pins.push((cursor.number("pin x")?, cursor.number("pin y")?));
    }
    cursor.finish()?;
    Ok(Response::Pins(pins))
}

/// Token reader over a response line
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn token(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn required(&mut self, field: &'static str) -> Result<&'a str, ParseResponseError> {
        self.token().ok_or(ParseResponseError::MissingField(field))
    }

    fn number<T: std::str::FromStr>(&mut self, field: &'static str) -> Result<T, ParseResponseError> {
        let token = self.required(field)?;
        token.parse().map_err(|_| ParseResponseError::InvalidNumber {
            field,
            value: token.to_string(),
        })
    }

    /// Exactly `count` characters following a single separator space
    fn chars(&mut self, count: usize) -> Result<&'a str, ParseResponseError> {
        if count == 0 {
            return Ok("");
        }
        let body = self
            .rest
            .strip_prefix(' ')
            .ok_or(ParseResponseError::Truncated { expected: count })?;
        let end = body
            .char_indices()
            .nth(count)
            .map(|(index, _)| index)
            .unwrap_or(body.len());
        let (message, rest) = body.split_at(end);
        if message.chars().count() != count {
            return Err(ParseResponseError::Truncated { expected: count });
        }
        self.rest = rest;
        Ok(message)
    }

    fn rest(&mut self) -> &'a str {
        let rest = self.rest.trim_start();
        self.rest = "";
        rest
    }

    fn finish(&mut self) -> Result<(), ParseResponseError> {
        match self.token() {
            None => Ok(()),
            Some(extra) => Err(ParseResponseError::TrailingData(extra.to_string())),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Init(info) => {
                write!(
                    f,
                    "DATA INIT {} {} {} {} {}",
                    info.board_width,
                    info.board_height,
                    info.note_width,
                    info.note_height,
                    info.colors.len()
                )?;
                for color in &info.colors {
                    write!(f, " {color}")?;
                }
                Ok(())
            }
            Response::Ok => f.write_str("OK"),
            Response::Error { code, message } => write!(f, "ERROR {code} {message}"),
            Response::Notes(notes) => {
                write!(f, "DATA NOTES {}", notes.len())?;
                for note in notes {
                    let length = note.message.chars().count();
                    write!(
                        f,
                        " {} {} {} {} {}",
                        note.x,
                        note.y,
                        note.color,
                        u8::from(note.pinned),
                        length
                    )?;
                    if length > 0 {
                        write!(f, " {}", note.message)?;
                    }
                }
                Ok(())
            }
            Response::Pins(pins) => {
                write!(f, "DATA PINS {}", pins.len())?;
                for (x, y) in pins {
                    write!(f, " {x} {y}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<ProtocolError> for Response {
    fn from(error: ProtocolError) -> Self {
        Response::error(error.code, error.message)
    }
}

impl From<BoardError> for Response {
    fn from(error: BoardError) -> Self {
        Response::error(ErrorCode::from(&error), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> BoardInfo {
        BoardInfo {
            board_width: 100,
            board_height: 50,
            note_width: 10,
            note_height: 10,
            colors: vec!["red".into(), "blue".into()],
        }
    }

    fn view(x: i32, y: i32, pinned: bool, message: &str) -> NoteView {
        NoteView {
            x,
            y,
            color: "red".into(),
            pinned,
            message: message.into(),
        }
    }

    #[test]
    fn test_format_simple_lines() {
        assert_eq!(Response::Ok.to_string(), "OK");
        assert_eq!(
            Response::Init(info()).to_string(),
            "DATA INIT 100 50 10 10 2 red blue"
        );
        assert_eq!(Response::Pins(vec![]).to_string(), "DATA PINS 0");
        assert_eq!(
            Response::Pins(vec![(5, 5), (5, 5), (7, 1)]).to_string(),
            "DATA PINS 3 5 5 5 5 7 1"
        );
    }

    #[test]
    fn test_format_notes() {
        let response = Response::Notes(vec![view(0, 0, true, "hello world"), view(20, 10, false, "x")]);
        assert_eq!(
            response.to_string(),
            "DATA NOTES 2 0 0 red 1 11 hello world 20 10 red 0 1 x"
        );
    }

    #[test]
    fn test_message_length_counts_characters() {
        let response = Response::Notes(vec![view(0, 0, false, "héllo")]);
        assert_eq!(response.to_string(), "DATA NOTES 1 0 0 red 0 5 héllo");
    }

    #[test]
    fn test_error_strips_line_breaks() {
        let response = Response::error(ErrorCode::InvalidFormat, "bad\r\nthing\n");
        assert_eq!(response.to_string(), "ERROR INVALID_FORMAT bad  thing ");
    }

    #[test]
    fn test_board_error_conversion() {
        let response = Response::from(BoardError::CompleteOverlap { x: 0, y: 0 });
        assert_eq!(
            response.to_string(),
            "ERROR COMPLETE_OVERLAP Cannot completely overlap existing note"
        );
    }

    #[test]
    fn test_parse_notes_with_tricky_messages() {
        let notes = vec![
            view(0, 0, true, "  leading and  double  "),
            view(1, 2, false, ""),
            view(3, 4, false, "7 7 red 1 3 fake"),
        ];
        let line = Response::Notes(notes.clone()).to_string();
        assert_eq!(Response::parse(&line).unwrap(), Response::Notes(notes));
    }

    #[test]
    fn test_parse_init_and_error() {
        assert_eq!(
            Response::parse("DATA INIT 100 50 10 10 2 red blue\r\n").unwrap(),
            Response::Init(info())
        );
        assert_eq!(
            Response::parse("ERROR PIN_NOT_FOUND No pin at given coordinate").unwrap(),
            Response::Error {
                code: ErrorCode::PinNotFound,
                message: "No pin at given coordinate".into(),
            }
        );
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(Response::parse(""), Err(ParseResponseError::Empty));
        assert_eq!(
            Response::parse("HELLO"),
            Err(ParseResponseError::UnknownKind("HELLO".into()))
        );
        assert_eq!(
            Response::parse("ERROR NOPE x"),
            Err(ParseResponseError::UnknownErrorCode("NOPE".into()))
        );
        assert_eq!(
            Response::parse("DATA PINS 2 1 1"),
            Err(ParseResponseError::MissingField("pin x"))
        );
        assert_eq!(
            Response::parse("DATA NOTES 1 0 0 red 0 10 short"),
            Err(ParseResponseError::Truncated { expected: 10 })
        );
        assert_eq!(
            Response::parse("OK extra"),
            Err(ParseResponseError::TrailingData("extra".into()))
        );
    }
}
