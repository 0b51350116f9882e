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

//! Server configuration

use bboard_protocol::DEFAULT_MAX_LINE_LENGTH;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Listener and session settings for a [`BoardServer`](crate::BoardServer)
///
/// # Example
///
/// ```
/// use bboard_service::ServerConfig;
/// use std::time::Duration;
///
/// let config = ServerConfig::new("127.0.0.1:4554".parse().unwrap())
///     .with_max_connections(500)
///     .with_idle_timeout(Some(Duration::from_secs(3600)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind; port 0 picks an ephemeral port
    pub bind_address: SocketAddr,

    /// Sessions allowed at once; extra sockets are closed on accept
    pub max_connections: usize,

    /// How long a session may go without a request line
    ///
    /// `None` keeps silent sessions open until the peer leaves.
    pub idle_timeout: Option<Duration>,

    /// Time allowed to flush one response line
    pub write_timeout: Duration,

    /// Grace period for sessions during shutdown before they are aborted
    pub shutdown_timeout: Duration,

    /// Longest accepted request line in bytes
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            max_connections: 1000,
            idle_timeout: None,
            write_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(5),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Defaults bound to `bind_address`
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            ..Default::default()
        }
    }

    /// Set the session limit
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the idle limit (None for no limit)
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the per-line write limit
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the shutdown grace period
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Set the longest accepted request line
    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Check that every limit is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }
        if self.idle_timeout.is_some_and(|idle| idle.is_zero()) {
            return Err("idle_timeout must be greater than 0".to_string());
        }
        if self.write_timeout.is_zero() {
            return Err("write_timeout must be greater than 0".to_string());
        }
        if self.shutdown_timeout.is_zero() {
            return Err("shutdown_timeout must be greater than 0".to_string());
        }
        if self.max_line_length == 0 {
            return Err("max_line_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_never_idle_out_by_default() {
        let config = ServerConfig::default();
        assert_eq!(config.idle_timeout, None);
        assert_eq!(config.max_connections, 1000);
        assert_eq!(config.max_line_length, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_long_idle_timeout_is_kept() {
        let config = ServerConfig::default()
            .with_idle_timeout(Some(Duration::from_secs(3600)))
            .with_max_line_length(1024);

        assert_eq!(config.idle_timeout, Some(Duration::from_secs(3600)));
        assert_eq!(config.max_line_length, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = ServerConfig::default();

        config.max_connections = 0;
        assert!(config.validate().is_err());

        config.max_connections = 1000;
        config.idle_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());

        config.idle_timeout = None;
        config.max_line_length = 0;
        assert_eq!(
            config.validate(),
            Err("max_line_length must be greater than 0".to_string())
        );
    }
}
