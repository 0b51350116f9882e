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

//! Protocol behavior against arbitrary input

use bboard_protocol::{BoardCodec, Command, ErrorCode, Line, NoteView, Response};
use bytes::BytesMut;
use futures_util::StreamExt;
use proptest::prelude::*;
use tokio_util::codec::{Decoder, FramedRead};

proptest! {
    #[test]
    fn parse_never_panics(line in "\\PC{0,64}") {
        let _ = Command::parse(&line);
    }

    #[test]
    fn parse_errors_are_request_level(line in "[A-Za-z0-9 =-]{0,40}") {
        if let Err(err) = Command::parse(&line) {
            prop_assert!(matches!(err.code, ErrorCode::InvalidFormat | ErrorCode::InvalidCommand));
            prop_assert!(!err.message.contains('\n'));
        }
    }

    #[test]
    fn post_message_keeps_inner_spacing(message in "[a-z0-9 ]{1,40}") {
        prop_assume!(!message.trim().is_empty());
        let line = format!("POST 3 4 red {message}");
        match Command::parse(&line) {
            Ok(Command::Post { message: parsed, .. }) => {
                prop_assert_eq!(parsed.as_str(), message.trim());
            }
            other => prop_assert!(false, "unexpected parse result {:?}", other),
        }
    }

    #[test]
    fn notes_response_recovers_messages(messages in prop::collection::vec("[^\r\n]{0,24}", 0..6)) {
        let notes: Vec<NoteView> = messages
            .iter()
            .enumerate()
            .map(|(i, message)| NoteView {
                x: i as i32,
                y: -(i as i32),
                color: "red".into(),
                pinned: i % 2 == 0,
                message: message.clone(),
            })
            .collect();
        let line = Response::Notes(notes.clone()).to_string();
        prop_assert_eq!(Response::parse(&line), Ok(Response::Notes(notes)));
    }

    #[test]
    fn codec_splits_arbitrary_chunks(split in 0usize..40) {
        let input = b"POST 0 0 red a\r\nGET PINS\nSHAKE\n";
        let split = split.min(input.len());
        let mut codec = BoardCodec::new();
        let mut buf = BytesMut::from(&input[..split]);
        let mut lines = Vec::new();
        while let Some(line) = codec.decode(&mut buf).unwrap() {
            lines.push(line);
        }
        buf.extend_from_slice(&input[split..]);
        while let Some(line) = codec.decode(&mut buf).unwrap() {
            lines.push(line);
        }
        let expected: Vec<Line> = ["POST 0 0 red a", "GET PINS", "SHAKE"]
            .into_iter()
            .map(|text| Line::Text(text.to_string()))
            .collect();
        prop_assert_eq!(lines, expected);
    }

    #[test]
    fn codec_recovers_after_any_long_line(len in 9usize..200, split in 0usize..220) {
        let mut input = vec![b'x'; len];
        input.extend_from_slice(b"\nPIN 1 2\n");
        let split = split.min(input.len());
        let mut codec = BoardCodec::with_max_line_length(8);
        let mut buf = BytesMut::from(&input[..split]);
        let mut lines = Vec::new();
        while let Some(line) = codec.decode(&mut buf).unwrap() {
            lines.push(line);
        }
        buf.extend_from_slice(&input[split..]);
        while let Some(line) = codec.decode(&mut buf).unwrap() {
            lines.push(line);
        }
        prop_assert_eq!(lines, vec![Line::TooLong, Line::Text("PIN 1 2".to_string())]);
    }
}

#[tokio::test]
async fn test_framed_read_over_stream() {
    let input: &[u8] = b"PIN 1 2\nGET color=red\nDISCONNECT";
    let mut frames = FramedRead::new(input, BoardCodec::new());
    let mut commands = Vec::new();
    while let Some(line) = frames.next().await {
        let text = line.unwrap().into_text().unwrap();
        commands.push(Command::parse(&text).unwrap());
    }
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0], Command::Pin { x: 1, y: 2 });
    assert!(matches!(&commands[1], Command::GetNotes(query) if query.color.as_deref() == Some("red")));
    assert_eq!(commands[2], Command::Disconnect);
}
