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

//! Session and reply counters
//!
//! [`ServerMetrics`] is shared by the accept loop and every worker. Byte
//! counts live per connection in [`ConnectionStats`](crate::ConnectionStats);
//! this type only tracks what happens to sessions and how requests end.

use bboard_protocol::Response;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Server-wide counters
#[derive(Debug)]
pub struct ServerMetrics {
    sessions_opened: AtomicU64,
    sessions_active: AtomicU64,
    session_time_ns: AtomicU64,
    requests: AtomicU64,
    replies: AtomicU64,
    request_errors: AtomicU64,
    board_errors: AtomicU64,
    oversized_lines: AtomicU64,
    rejected_connections: AtomicU64,
    transport_errors: AtomicU64,
    timeouts: AtomicU64,
    started_at: Instant,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    /// All counters at zero, uptime starting now
    pub fn new() -> Self {
        Self {
            sessions_opened: AtomicU64::new(0),
            sessions_active: AtomicU64::new(0),
            session_time_ns: AtomicU64::new(0),
            requests: AtomicU64::new(0),
            replies: AtomicU64::new(0),
            request_errors: AtomicU64::new(0),
            board_errors: AtomicU64::new(0),
            oversized_lines: AtomicU64::new(0),
            rejected_connections: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
        self.sessions_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn session_closed(&self, lasted: Duration) {
        self.sessions_active.fetch_sub(1, Ordering::Relaxed);
        self.session_time_ns
            .fetch_add(lasted.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn request_received(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a reply and sort `ERROR` replies into request or board failures
    pub fn reply_sent(&self, response: &Response) {
        self.replies.fetch_add(1, Ordering::Relaxed);
        if let Response::Error { code, .. } = response {
            let bucket = if code.is_domain_error() {
                &self.board_errors
            } else {
                &self.request_errors
            };
            bucket.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn line_too_long(&self) {
        self.oversized_lines.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_rejected(&self) {
        self.rejected_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Sessions currently open
    pub fn active_sessions(&self) -> u64 {
        self.sessions_active.load(Ordering::Relaxed)
    }

    /// Read every counter
    ///
    /// Fields are loaded one at a time, so a snapshot taken under load may
    /// be off by a request or two between fields.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_sessions = self.sessions_opened.load(Ordering::Relaxed);
        let mean_session_time = match total_sessions {
            0 => Duration::ZERO,
            n => Duration::from_nanos(self.session_time_ns.load(Ordering::Relaxed) / n),
        };

        MetricsSnapshot {
            total_sessions,
            active_sessions: self.sessions_active.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            replies: self.replies.load(Ordering::Relaxed),
            request_errors: self.request_errors.load(Ordering::Relaxed),
            board_errors: self.board_errors.load(Ordering::Relaxed),
            oversized_lines: self.oversized_lines.load(Ordering::Relaxed),
            rejected_connections: self.rejected_connections.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
            mean_session_time,
        }
    }
}

/// Point-in-time copy of [`ServerMetrics`]
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Sessions opened since start
    pub total_sessions: u64,
    /// Sessions open now
    pub active_sessions: u64,
    /// Request lines read, oversized ones included
    pub requests: u64,
    /// Lines written, init lines included
    pub replies: u64,
    /// `INVALID_FORMAT` and `INVALID_COMMAND` replies
    pub request_errors: u64,
    /// Replies carrying a board error code
    pub board_errors: u64,
    /// Request lines discarded for exceeding the limit
    pub oversized_lines: u64,
    /// Sockets closed at accept because the session limit was reached
    pub rejected_connections: u64,
    /// Sessions ended by a socket or accept failure
    pub transport_errors: u64,
    /// Sessions ended by the idle or write deadline
    pub timeouts: u64,
    /// Time since the server was created
    pub uptime: Duration,
    /// Average length of a closed or open session
    pub mean_session_time: Duration,
}

impl MetricsSnapshot {
    /// Replies that were `ERROR` lines
    pub fn error_replies(&self) -> u64 {
        self.request_errors + self.board_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bboard_protocol::ErrorCode;
    use std::sync::Arc;

    #[test]
    fn test_session_lifetimes() {
        let metrics = ServerMetrics::new();
        metrics.session_opened();
        metrics.session_opened();
        metrics.session_closed(Duration::from_secs(10));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_sessions, 2);
        assert_eq!(snapshot.active_sessions, 1);
        assert_eq!(snapshot.mean_session_time, Duration::from_secs(5));
        assert_eq!(metrics.active_sessions(), 1);
    }

    #[test]
    fn test_replies_sorted_by_outcome() {
        let metrics = ServerMetrics::new();
        metrics.reply_sent(&Response::Ok);
        metrics.reply_sent(&Response::error(ErrorCode::InvalidCommand, "Unknown command"));
        metrics.reply_sent(&Response::error(ErrorCode::CompleteOverlap, "taken"));
        metrics.reply_sent(&Response::error(ErrorCode::PinNotFound, "none"));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.replies, 4);
        assert_eq!(snapshot.request_errors, 1);
        assert_eq!(snapshot.board_errors, 2);
        assert_eq!(snapshot.error_replies(), 3);
    }

    #[test]
    fn test_counters_from_many_threads() {
        let metrics = Arc::new(ServerMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.request_received();
                    }
                    metrics.connection_rejected();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 2000);
        assert_eq!(snapshot.rejected_connections, 8);
    }
}
