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

//! Request parsing
//!
//! A request is one line of text. The first whitespace-delimited token,
//! matched case-insensitively, selects the command; the rest is parsed per
//! command. Parsing never touches the board, so every failure here is an
//! `INVALID_FORMAT` or `INVALID_COMMAND` error.

use crate::ProtocolError;
use bboard_board::NoteQuery;
use std::fmt;
use std::str::FromStr;

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session after replying `OK`
    Disconnect,
    /// Remove every note and pin
    Clear,
    /// Remove every unpinned note
    Shake,
    /// Post a note
    Post {
        /// Anchor x
        x: i32,
        /// Anchor y
        y: i32,
        /// Color name, matched case-sensitively by the board
        color: String,
        /// Message text with internal whitespace preserved
        message: String,
    },
    /// Pin notes covering a point
    Pin {
        /// Point x
        x: i32,
        /// Point y
        y: i32,
    },
    /// Remove one pin at a point
    Unpin {
        /// Point x
        x: i32,
        /// Point y
        y: i32,
    },
    /// List all pins
    GetPins,
    /// List notes matching a query
    GetNotes(NoteQuery),
}

impl Command {
    /// Parse one request line
    ///
    /// # Example
    ///
    /// ```
    /// use bboard_protocol::{Command, ErrorCode};
    ///
    /// let cmd = Command::parse("post 10 20 red buy  milk").unwrap();
    /// assert_eq!(
    ///     cmd,
    ///     Command::Post { x: 10, y: 20, color: "red".into(), message: "buy  milk".into() }
    /// );
    ///
    /// let err = Command::parse("FROB").unwrap_err();
    /// assert_eq!(err.code, ErrorCode::InvalidCommand);
    /// ```
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(verb) = parts.first() else {
            return Err(ProtocolError::invalid_format("Empty request"));
        };

        match verb.to_uppercase().as_str() {
            "DISCONNECT" => Ok(Command::Disconnect),
            "CLEAR" => Ok(Command::Clear),
            "SHAKE" => Ok(Command::Shake),
            "POST" => parse_post(line, &parts),
            "PIN" => {
                let (x, y) = parse_point("PIN", &parts)?;
                Ok(Command::Pin { x, y })
            }
            "UNPIN" => {
                let (x, y) = parse_point("UNPIN", &parts)?;
                Ok(Command::Unpin { x, y })
            }
            "GET" => parse_get(&parts),
            _ => Err(ProtocolError::invalid_command("Unknown command")),
        }
    }

    /// Whether this command ends the session
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Command::Disconnect)
    }

    /// Short name for logs and metric labels
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Disconnect => "disconnect",
            Command::Clear => "clear",
            Command::Shake => "shake",
            Command::Post { .. } => "post",
            Command::Pin { .. } => "pin",
            Command::Unpin { .. } => "unpin",
            Command::GetPins => "get_pins",
            Command::GetNotes(_) => "get_notes",
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

fn parse_post(line: &str, parts: &[&str]) -> Result<Command, ProtocolError> {
    let [_, x, y, color, _, ..] = parts else {
        return Err(ProtocolError::invalid_format(
            "POST required x y color message",
        ));
    };
    let (x, y) = parse_coordinates(x, y)?;

    let message = remainder_after(line, 4);
    if message.is_empty() {
        return Err(ProtocolError::invalid_format("POST missing message"));
    }

    Ok(Command::Post {
        x,
        y,
        color: (*color).to_string(),
        message: message.to_string(),
    })
}

fn parse_point(verb: &str, parts: &[&str]) -> Result<(i32, i32), ProtocolError> {
    match parts {
        [_, x, y] => parse_coordinates(x, y),
        _ => Err(ProtocolError::invalid_format(format!("{verb} requires x y"))),
    }
}

fn parse_coordinates(x: &str, y: &str) -> Result<(i32, i32), ProtocolError> {
    match (x.parse(), y.parse()) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(ProtocolError::invalid_format("x and y must be integers")),
    }
}

fn parse_get(parts: &[&str]) -> Result<Command, ProtocolError> {
    if let [_, keyword] = parts {
        if keyword.eq_ignore_ascii_case("PINS") {
            return Ok(Command::GetPins);
        }
    }

    let mut query = NoteQuery::new();
    let mut tokens = parts.iter().skip(1);
    while let Some(token) = tokens.next() {
        if let Some(color) = token.strip_prefix("color=") {
            if color.is_empty() {
                return Err(ProtocolError::invalid_format("color filter missing value"));
            }
            query.color = Some(color.to_string());
        } else if let Some(x) = token.strip_prefix("contains=") {
            if x.is_empty() {
                return Err(ProtocolError::invalid_format("contains filter missing x"));
            }
            let Some(y) = tokens.next() else {
                return Err(ProtocolError::invalid_format("contains filter missing y"));
            };
            match (x.parse(), y.parse()) {
                (Ok(x), Ok(y)) => query.contains = Some((x, y)),
                _ => {
                    return Err(ProtocolError::invalid_format(
                        "contains requires integer x and y",
                    ));
                }
            }
        } else if let Some(text) = token.strip_prefix("refersTo=") {
            if text.is_empty() {
                return Err(ProtocolError::invalid_format("refersTo filter missing value"));
            }
            query.refers_to = Some(text.to_string());
        } else {
            return Err(ProtocolError::invalid_format("Unknown GET filter"));
        }
    }

    Ok(Command::GetNotes(query))
}

/// Text following the first `n` whitespace-delimited tokens
fn remainder_after(line: &str, n: usize) -> &str {
    let mut rest = line;
    for _ in 0..n {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = &rest[end..];
    }
    rest.trim_start()
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Disconnect => f.write_str("DISCONNECT"),
            Command::Clear => f.write_str("CLEAR"),
            Command::Shake => f.write_str("SHAKE"),
            Command::Post {
                x,
                y,
                color,
                message,
            } => write!(f, "POST {x} {y} {color} {message}"),
            Command::Pin { x, y } => write!(f, "PIN {x} {y}"),
            Command::Unpin { x, y } => write!(f, "UNPIN {x} {y}"),
            Command::GetPins => f.write_str("GET PINS"),
            Command::GetNotes(query) => {
                f.write_str("GET")?;
                if let Some(color) = &query.color {
                    write!(f, " color={color}")?;
                }
                if let Some((x, y)) = query.contains {
                    write!(f, " contains={x} {y}")?;
                }
                if let Some(text) = &query.refers_to {
                    write!(f, " refersTo={text}")?;
                }
                Ok(())
            }
        }
    }
}
