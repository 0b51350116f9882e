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

//! Typed board client

use crate::{ClientConfig, ClientError, Result};
use bboard_board::NoteQuery;
use bboard_protocol::{BoardCodec, BoardInfo, CodecError, Command, Line, NoteView, Response};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, info, instrument, trace, warn};

/// A connected board session
///
/// Requests are strictly sequential: every call writes one line and waits
/// for the single response line that answers it.
pub struct BoardClient {
    framed: Framed<TcpStream, BoardCodec>,
    config: ClientConfig,
    info: BoardInfo,
    peer_addr: SocketAddr,
}

impl BoardClient {
    /// Connect and read the server's init line
    #[instrument(skip(config), fields(address = %config.address()))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let stream = timeout(config.connect_timeout, TcpStream::connect(config.address()))
            .await
            .map_err(|_| ClientError::ConnectionTimeout)??;
        let peer_addr = stream.peer_addr()?;
        if let Err(err) = stream.set_nodelay(true) {
            warn!(error = %err, "Failed to set TCP_NODELAY");
        }

        let mut framed = Framed::new(stream, BoardCodec::with_max_line_length(config.max_line_length));
        let line = read_line(&mut framed, &config).await?;
        let info = match Response::parse(&line)? {
            Response::Init(info) => info,
            other => return Err(ClientError::UnexpectedResponse(other.to_string())),
        };

        info!(
            peer_addr = %peer_addr,
            board_width = info.board_width,
            board_height = info.board_height,
            "Connected to board"
        );

        Ok(Self {
            framed,
            config,
            info,
            peer_addr,
        })
    }

    /// Board geometry and colors from the init line
    pub fn info(&self) -> &BoardInfo {
        &self.info
    }

    /// Address of the server
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a raw request line and parse the reply
    ///
    /// `ERROR` replies are returned as [`Response::Error`], not as `Err`.
    #[instrument(skip(self))]
    pub async fn request(&mut self, line: &str) -> Result<Response> {
        if line.contains(['\r', '\n']) {
            return Err(ClientError::InvalidRequest(
                "request must be a single line".to_string(),
            ));
        }

        self.framed.send(line).await?;
        let reply = read_line(&mut self.framed, &self.config).await?;
        trace!(reply = %reply, "Received reply");
        Ok(Response::parse(&reply)?)
    }

    /// Send a typed command and parse the reply
    pub async fn send(&mut self, command: &Command) -> Result<Response> {
        self.request(&command.to_string()).await
    }

    /// Post a note anchored at `(x, y)`
    pub async fn post(&mut self, x: i32, y: i32, color: &str, message: &str) -> Result<()> {
        if color.is_empty() || color.contains(char::is_whitespace) {
            return Err(ClientError::InvalidRequest(format!("invalid color {color:?}")));
        }
        if message.trim().is_empty() {
            return Err(ClientError::InvalidRequest("message must not be empty".to_string()));
        }
        let command = Command::Post {
            x,
            y,
            color: color.to_string(),
            message: message.to_string(),
        };
        self.expect_ok(&command).await
    }

    /// Add a pin at `(x, y)`
    pub async fn pin(&mut self, x: i32, y: i32) -> Result<()> {
        self.expect_ok(&Command::Pin { x, y }).await
    }

    /// Remove one pin at `(x, y)`
    pub async fn unpin(&mut self, x: i32, y: i32) -> Result<()> {
        self.expect_ok(&Command::Unpin { x, y }).await
    }

    /// Remove every note and pin
    pub async fn clear(&mut self) -> Result<()> {
        self.expect_ok(&Command::Clear).await
    }

    /// Remove every unpinned note
    pub async fn shake(&mut self) -> Result<()> {
        self.expect_ok(&Command::Shake).await
    }

    /// Notes matching `query`, in posting order
    pub async fn notes(&mut self, query: &NoteQuery) -> Result<Vec<NoteView>> {
        let single_token = |value: &Option<String>| {
            value
                .as_deref()
                .is_none_or(|v| !v.is_empty() && !v.contains(char::is_whitespace))
        };
        if !single_token(&query.color) || !single_token(&query.refers_to) {
            return Err(ClientError::InvalidRequest(
                "filter values must be single non-empty words".to_string(),
            ));
        }

        match self.send(&Command::GetNotes(query.clone())).await? {
            Response::Notes(notes) => Ok(notes),
            other => Err(unexpected(other)),
        }
    }

    /// Every pin, one entry per unit of multiplicity, in ascending order
    pub async fn pins(&mut self) -> Result<Vec<(i32, i32)>> {
        match self.send(&Command::GetPins).await? {
            Response::Pins(pins) => Ok(pins),
            other => Err(unexpected(other)),
        }
    }

    /// End the session
    pub async fn disconnect(mut self) -> Result<()> {
        self.expect_ok(&Command::Disconnect).await?;
        debug!(peer_addr = %self.peer_addr, "Disconnected");
        Ok(())
    }

    async fn expect_ok(&mut self, command: &Command) -> Result<()> {
        match self.send(command).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Response) -> ClientError {
    match response {
        Response::Error { code, message } => ClientError::Server { code, message },
        other => ClientError::UnexpectedResponse(other.to_string()),
    }
}

async fn read_line(framed: &mut Framed<TcpStream, BoardCodec>, config: &ClientConfig) -> Result<String> {
    let next = match config.response_timeout {
        Some(limit) => timeout(limit, framed.next())
            .await
            .map_err(|_| ClientError::ResponseTimeout)?,
        None => framed.next().await,
    };
    match next {
        Some(Ok(Line::Text(line))) => Ok(line),
        Some(Ok(Line::TooLong)) => Err(CodecError::LineTooLong {
            max: config.max_line_length,
        }
        .into()),
        Some(Err(err)) => Err(err.into()),
        None => Err(ClientError::ConnectionClosed),
    }
}

impl std::fmt::Debug for BoardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardClient")
            .field("peer_addr", &self.peer_addr)
            .field("info", &self.info)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bboard_protocol::ErrorCode;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    const INIT: &str = "DATA INIT 100 100 10 5 2 red blue";

    /// Serve one connection: send `greeting`, then answer each request line
    /// with the next scripted reply and collect what the client sent.
    async fn scripted_server(
        greeting: &'static str,
        replies: Vec<&'static str>,
    ) -> (ClientConfig, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();
            write.write_all(format!("{greeting}\n").as_bytes()).await.unwrap();
            let mut received = Vec::new();
            for reply in replies {
                match lines.next_line().await.unwrap() {
                    Some(line) => received.push(line),
                    None => break,
                }
                write.write_all(format!("{reply}\n").as_bytes()).await.unwrap();
            }
            received
        });
        let config = ClientConfig::new("127.0.0.1", port)
            .with_response_timeout(Some(Duration::from_secs(2)));
        (config, handle)
    }

    #[tokio::test]
    async fn test_connect_reads_board_info() {
        let (config, server) = scripted_server(INIT, vec![]).await;
        let client = BoardClient::connect(config).await.unwrap();

        let info = client.info();
        assert_eq!(info.board_width, 100);
        assert_eq!(info.note_height, 5);
        assert_eq!(info.colors, vec!["red".to_string(), "blue".to_string()]);

        drop(client);
        assert!(server.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_rejects_non_init_greeting() {
        let (config, _server) = scripted_server("OK", vec![]).await;
        let err = BoardClient::connect(config).await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_typed_calls_send_protocol_lines() {
        let (config, server) =
            scripted_server(INIT, vec!["OK", "OK", "DATA PINS 1 1 1", "OK"]).await;
        let mut client = BoardClient::connect(config).await.unwrap();

        client.post(0, 0, "red", "hello  world").await.unwrap();
        client.pin(1, 1).await.unwrap();
        assert_eq!(client.pins().await.unwrap(), vec![(1, 1)]);
        client.disconnect().await.unwrap();

        let sent = server.await.unwrap();
        assert_eq!(sent[0], "POST 0 0 red hello  world");
        assert_eq!(sent[1], "PIN 1 1");
        assert_eq!(sent[2], "GET PINS");
        assert_eq!(sent[3], "DISCONNECT");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_client_error() {
        let (config, _server) =
            scripted_server(INIT, vec!["ERROR OUT_OF_BOUNDS Note does not fit on the board"]).await;
        let mut client = BoardClient::connect(config).await.unwrap();

        let err = client.post(99, 99, "red", "edge").await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::OutOfBounds));
    }

    #[tokio::test]
    async fn test_raw_request_returns_error_response() {
        let (config, _server) = scripted_server(INIT, vec!["ERROR INVALID_COMMAND Unknown command JUMP"]).await;
        let mut client = BoardClient::connect(config).await.unwrap();

        let response = client.request("JUMP").await.unwrap();
        assert!(response.is_error());
    }

    #[tokio::test]
    async fn test_notes_filters_are_validated_locally() {
        let (config, _server) = scripted_server(INIT, vec![]).await;
        let mut client = BoardClient::connect(config).await.unwrap();

        let query = NoteQuery::new().with_refers_to("two words");
        let err = client.notes(&query).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));

        let err = client.request("PIN 1 1\nCLEAR").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_oversized_reply_is_a_codec_error() {
        let long_reply: &'static str = Box::leak(format!("DATA NOTES 1 0 0 red 0 {}", "x".repeat(200)).into_boxed_str());
        let (config, _server) = scripted_server(INIT, vec![long_reply]).await;
        let mut client = BoardClient::connect(config.with_max_line_length(64)).await.unwrap();

        let err = client.request("GET").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Codec(CodecError::LineTooLong { max: 64 })
        ));
    }

    #[tokio::test]
    async fn test_response_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(format!("{INIT}\n").as_bytes()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let config = ClientConfig::new("127.0.0.1", port)
            .with_response_timeout(Some(Duration::from_millis(100)));
        let mut client = BoardClient::connect(config).await.unwrap();
        let err = client.shake().await.unwrap_err();
        assert!(matches!(err, ClientError::ResponseTimeout));
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let (config, server) = scripted_server(INIT, vec![]).await;
        let mut client = BoardClient::connect(config).await.unwrap();
        server.await.unwrap();

        let err = client.clear().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ConnectionClosed | ClientError::Io(_)
        ));
    }
}
