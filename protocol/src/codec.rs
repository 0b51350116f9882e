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

//! Newline-delimited framing
//!
//! [`BoardCodec`] splits an inbound byte stream into request or response
//! lines and writes outbound items followed by a single `\n`. A trailing
//! `\r` is dropped so CRLF clients work unchanged. Bytes that are not
//! valid UTF-8 are replaced rather than rejected; the parser then reports
//! the line as malformed.
//!
//! A line longer than the limit is dropped up to and including its
//! terminator and surfaces as [`Line::TooLong`], so the stream stays usable.

use crate::{CodecError, Command, Response};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

/// Default upper bound on a single line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// One inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Line text without its terminator
    Text(String),
    /// A line over the limit; its bytes were discarded
    TooLong,
}

impl Line {
    /// The text, or `None` for a discarded line
    pub fn into_text(self) -> Option<String> {
        match self {
            Line::Text(text) => Some(text),
            Line::TooLong => None,
        }
    }
}

/// Line codec shared by the server and the client
#[derive(Debug, Clone)]
pub struct BoardCodec {
    max_line_length: usize,
    /// Bytes already scanned for a newline in the current buffer
    next_index: usize,
    /// Dropping input until the end of an over-long line
    discarding: bool,
}

impl BoardCodec {
    /// Codec with [`DEFAULT_MAX_LINE_LENGTH`]
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Codec that discards lines longer than `max_line_length` bytes
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            next_index: 0,
            discarding: false,
        }
    }

    /// Configured limit
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn take_line(&mut self, src: &mut BytesMut, len: usize, consume: usize) -> Line {
        let raw = src.split_to(len);
        src.advance(consume - len);
        self.next_index = 0;
        let mut bytes = &raw[..];
        if let Some(stripped) = bytes.strip_suffix(b"\r") {
            bytes = stripped;
        }
        Line::Text(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Default for BoardCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for BoardCodec {
    type Item = Line;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Line>, Self::Error> {
        let scan_from = self.next_index.min(src.len());
        let newline = src[scan_from..]
            .iter()
            .position(|byte| *byte == b'\n')
            .map(|offset| scan_from + offset);

        match newline {
            Some(end) if self.discarding || end > self.max_line_length => {
                if !self.discarding {
                    warn!(length = end, max = self.max_line_length, "Line too long");
                }
                src.advance(end + 1);
                self.next_index = 0;
                self.discarding = false;
                Ok(Some(Line::TooLong))
            }
            Some(end) => {
                let line = self.take_line(src, end, end + 1);
                trace!("Decoded line");
                Ok(Some(line))
            }
            None if self.discarding || src.len() > self.max_line_length => {
                if !self.discarding {
                    warn!(length = src.len(), max = self.max_line_length, "Line too long");
                    self.discarding = true;
                }
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Line>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if self.discarding => {
                self.discarding = false;
                Ok(Some(Line::TooLong))
            }
            None if src.is_empty() => Ok(None),
            None => {
                let len = src.len();
                Ok(Some(self.take_line(src, len, len)))
            }
        }
    }
}

impl Encoder<&str> for BoardCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

impl Encoder<String> for BoardCodec {
    type Error = CodecError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(item.as_str(), dst)
    }
}

impl Encoder<Response> for BoardCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(item.to_string().as_str(), dst)
    }
}

impl Encoder<&Response> for BoardCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(item.to_string().as_str(), dst)
    }
}

impl Encoder<Command> for BoardCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(item.to_string().as_str(), dst)
    }
}
