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

//! Command line arguments for the `bboard` binary

use bboard_board::{BoardConfig, ConfigError};
use bboard_service::ServerConfig;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "bboard")]
#[command(version)]
#[command(about = "Shared networked bulletin board server", long_about = None)]
#[command(after_help = "Example:\n  bboard 4554 200 100 20 10 white green yellow")]
pub struct Cli {
    /// TCP port to listen on
    pub port: u16,

    /// Board width
    pub board_width: u32,

    /// Board height
    pub board_height: u32,

    /// Note width
    pub note_width: u32,

    /// Note height
    pub note_height: u32,

    /// Colors notes may use
    #[arg(required = true, num_args = 1..)]
    pub colors: Vec<String>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Maximum concurrent sessions
    #[arg(long, default_value_t = 1000)]
    pub max_connections: usize,

    /// Close sessions silent for this many seconds; unset keeps them open
    #[arg(long)]
    pub idle_timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Board configuration from the positional arguments
    pub fn board_config(&self) -> Result<BoardConfig, ConfigError> {
        BoardConfig::new(
            self.board_width,
            self.board_height,
            self.note_width,
            self.note_height,
            &self.colors,
        )
    }

    /// Server configuration from the port and the tuning flags
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(SocketAddr::new(self.host, self.port))
            .with_max_connections(self.max_connections)
            .with_idle_timeout(self.idle_timeout_secs.map(Duration::from_secs))
    }
}
