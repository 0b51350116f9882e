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

use bboard_protocol::{BoardCodec, Command, NoteView, Response};
use bytes::BytesMut;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tokio_util::codec::{Decoder, Encoder};

fn bench_parse_commands(c: &mut Criterion) {
    let lines = [
        "POST 10 20 red a reasonably long message with several words",
        "GET color=red contains=15 25 refersTo=message",
        "GET PINS",
        "UNPIN 5 5",
    ];
    c.bench_function("parse_commands", |b| {
        b.iter(|| {
            for line in &lines {
                let _ = black_box(Command::parse(black_box(line)));
            }
        })
    });
}

fn bench_notes_response(c: &mut Criterion) {
    let notes: Vec<NoteView> = (0..100)
        .map(|i| NoteView {
            x: i * 10,
            y: i * 5,
            color: "blue".into(),
            pinned: i % 3 == 0,
            message: format!("note number {i} with some text"),
        })
        .collect();
    let response = Response::Notes(notes);
    let line = response.to_string();

    c.bench_function("format_notes_response", |b| {
        b.iter(|| black_box(&response).to_string())
    });
    c.bench_function("parse_notes_response", |b| {
        b.iter(|| Response::parse(black_box(&line)))
    });
}

fn bench_codec(c: &mut Criterion) {
    let mut input = BytesMut::new();
    let mut codec = BoardCodec::new();
    for i in 0..100 {
        codec
            .encode(format!("POST {i} {i} red message {i}"), &mut input)
            .unwrap();
    }
    let input = input.freeze();

    c.bench_function("decode_100_lines", |b| {
        b.iter(|| {
            let mut codec = BoardCodec::new();
            let mut buf = BytesMut::from(&input[..]);
            let mut count = 0;
            while let Ok(Some(line)) = codec.decode(&mut buf) {
                black_box(line);
                count += 1;
            }
            count
        })
    });
}

criterion_group!(benches, bench_parse_commands, bench_notes_response, bench_codec);
criterion_main!(benches);
