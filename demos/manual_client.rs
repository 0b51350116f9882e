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

//! Manual Bulletin Board Client
//!
//! Reads request lines from stdin, sends them to a board server and prints
//! each reply as it arrives.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example manual_client -- localhost 4554
//! ```

use bboard_client::{BoardClient, ClientConfig, ClientError, Response};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).map(|s| s.as_str()).unwrap_or("localhost");
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4554);

    let config = ClientConfig::new(host, port).with_response_timeout(None);
    let mut client = BoardClient::connect(config).await?;

    let info = client.info();
    println!("Connected to {}", client.peer_addr());
    println!(
        "Board {}x{}, notes {}x{}, colors: {}",
        info.board_width,
        info.board_height,
        info.note_width,
        info.note_height,
        info.colors.join(" ")
    );
    println!("Type requests, DISCONNECT to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match client.request(&line).await {
            Ok(response) => {
                print_response(&response);
                if matches!(response, Response::Ok)
                    && line.trim().eq_ignore_ascii_case("disconnect")
                {
                    break;
                }
            }
            Err(ClientError::ConnectionClosed) => {
                println!("Server closed the connection");
                break;
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

fn print_response(response: &Response) {
    match response {
        Response::Notes(notes) => {
            println!("{} note(s)", notes.len());
            for note in notes {
                let pin = if note.pinned { "pinned" } else { "loose" };
                println!("  ({}, {}) {} [{}] {}", note.x, note.y, note.color, pin, note.message);
            }
        }
        Response::Pins(pins) => {
            println!("{} pin(s)", pins.len());
            for (x, y) in pins {
                println!("  ({x}, {y})");
            }
        }
        other => println!("{other}"),
    }
}
