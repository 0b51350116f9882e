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

//! `bboard` - shared bulletin board server
//!
//! ```bash
//! bboard 4554 200 100 20 10 white green yellow
//! ```

use bboard_service::{BoardServer, SharedBoard};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&cli.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let board_config = match cli.board_config() {
        Ok(config) => config,
        Err(e) => Cli::command()
            .error(ErrorKind::ValueValidation, format!("ERROR: {e}"))
            .exit(),
    };
    let server_config = cli.server_config();

    println!("Bboard server starting...");
    println!("Port: {}", cli.port);
    println!("Board: {} x {}", board_config.board_width(), board_config.board_height());
    println!("Note: {} x {}", board_config.note_width(), board_config.note_height());
    println!("Colors: [{}]", board_config.colors().join(", "));

    let board = SharedBoard::from_config(board_config);
    let server = match BoardServer::new(server_config, board).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Failed to bind server");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!(error = %e, "Failed to start server");
        return ExitCode::FAILURE;
    }
    info!(address = %server.bind_address(), "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    info!("Shutting down");
    let snapshot = server.snapshot();
    if let Err(e) = server.shutdown().await {
        error!(error = %e, "Shutdown failed");
        return ExitCode::FAILURE;
    }
    info!(
        sessions = snapshot.total_sessions,
        requests = snapshot.requests,
        error_replies = snapshot.error_replies(),
        oversized_lines = snapshot.oversized_lines,
        rejected_connections = snapshot.rejected_connections,
        timeouts = snapshot.timeouts,
        uptime = ?snapshot.uptime,
        "Server stopped"
    );

    ExitCode::SUCCESS
}
