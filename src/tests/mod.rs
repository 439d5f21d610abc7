//! End-to-end tests of the elicitation flow.
//! `flow` drives in-memory fake servers, `lifecycle` spawns real child processes.


use crate::{Config, transport::LineTransport};
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio_util::codec::{FramedRead, LinesCodec};

/// Config suited to tests: no pause before reading the elicitation request
pub fn config() -> Config {
    Config::default().with_elicitation_delay(Duration::ZERO)
}

/// Server end of an in-memory connection
pub struct FakeServer {
    reader: FramedRead<DuplexStream, LinesCodec>,
    writer: DuplexStream,
}

/// Connects a client transport to a scripted server
pub fn connect() -> (LineTransport<DuplexStream, DuplexStream>, FakeServer) {
    let (client_out, server_in) = tokio::io::duplex(1 << 17);
    let (server_out, client_in) = tokio::io::duplex(1 << 17);
    let transport = LineTransport::new(client_in, client_out);
    let server = FakeServer {
        reader: FramedRead::new(server_in, LinesCodec::new()),
        writer: server_out,
    };
    (transport, server)
}

impl FakeServer {
    /// Next message from the client, `None` once the client hangs up
    pub async fn next(&mut self) -> Option<Value> {
        let line = self.reader.next().await?.unwrap();
        Some(serde_json::from_str(&line).unwrap())
    }

    /// Next message from the client, which must have the given method
    pub async fn expect(&mut self, method: &str) -> Value {
        let message = self.next().await.expect("client hung up");
        assert_eq!(message["method"], method, "unexpected message: {message}");
        message
    }

    pub async fn reply(&mut self, message: Value) {
        self.raw(&message.to_string()).await;
    }

    /// Writes `line` verbatim, followed by a newline
    pub async fn raw(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    /// Answers `initialize` the way a conforming server does
    pub async fn handshake(&mut self) {
        let init = self.expect("initialize").await;
        self.reply(serde_json::json!({
            "jsonrpc": "2.0",
            "id": init["id"],
            "result": {
                "protocolVersion": "2025-06-18",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "fake-server", "version": "0.0.0"}
            }
        }))
        .await;
        self.expect("notifications/initialized").await;
    }
}
