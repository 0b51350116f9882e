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

//! Benchmarks for board operations

use bboard_board::{Board, BoardConfig, NoteQuery};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

fn populated_board(notes: i32) -> Board {
    let config = BoardConfig::new(1000, 1000, 10, 10, ["red", "blue", "green"]).unwrap();
    let mut board = Board::new(config);
    for i in 0..notes {
        let x = (i * 7) % 990;
        let y = (i * 13) % 990;
        let _ = board.post(x, y, "red", format!("note number {i}"));
    }
    board
}

fn bench_post(c: &mut Criterion) {
    let mut group = c.benchmark_group("post");
    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("into_{size}"), |b| {
            b.iter_batched(
                || populated_board(size),
                |mut board| black_box(board.post(985, 985, "blue", "bench")),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_pin_unpin(c: &mut Criterion) {
    let mut board = populated_board(1000);
    c.bench_function("pin_unpin_1000", |b| {
        b.iter(|| {
            let _ = board.pin(black_box(5), black_box(5));
            let _ = board.unpin(black_box(5), black_box(5));
        })
    });
}

fn bench_query(c: &mut Criterion) {
    let board = populated_board(1000);
    let mut group = c.benchmark_group("query");

    group.bench_function("all_notes", |b| {
        let query = NoteQuery::new();
        b.iter(|| black_box(board.notes(&query).count()))
    });

    group.bench_function("filtered_notes", |b| {
        let query = NoteQuery::new()
            .with_color("RED")
            .with_contains(500, 500)
            .with_refers_to("NUMBER 5");
        b.iter(|| black_box(board.notes(&query).count()))
    });

    group.finish();
}

criterion_group!(benches, bench_post, bench_pin_unpin, bench_query);
criterion_main!(benches);
