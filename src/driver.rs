use crate::{
    Config, Console, Error, Result,
    transport::LineTransport,
    types::{
        CALL_TOOL_ID, CallToolParams, ElicitAction, ElicitResult, INITIALIZE_ID, InitializeParams,
        METHOD_CALL_TOOL, METHOD_ELICITATION_CREATE, METHOD_INITIALIZE, METHOD_INITIALIZED,
        Message, Notification, Request, RequestId, Response,
    },
};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};

/// Position in the elicitation script
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Initialize,
    Notify,
    CallTool,
    AwaitElicitation,
    Accept(RequestId),
    AwaitFinal,
    Done(Outcome),
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server answered the tool call after the elicitation was answered
    Completed,
    /// Nothing came back from `initialize`
    NoInitResponse,
    /// The message after the tool call was not an elicitation request
    UnexpectedFlow(Option<Value>),
    /// Nothing came back after the elicitation was answered
    NoFinalResponse,
    /// The operator interrupted the run
    Interrupted,
    /// Sending failed or the exchange could not continue
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Walks the fixed elicitation script over a line transport.
pub struct Driver<'a, R, W> {
    config: &'a Config,
    console: &'a mut Console,
    transport: LineTransport<R, W>,
}

impl<'a, R, W> Driver<'a, R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(config: &'a Config, console: &'a mut Console, transport: LineTransport<R, W>) -> Self {
        Self {
            config,
            console,
            transport,
        }
    }

    /// Runs every step until the script is done.
    ///
    /// Early endings (no response, unexpected message) are outcomes; only
    /// failures to talk to the server are errors.
    pub async fn run(&mut self) -> Result<Outcome> {
        let mut step = Step::Initialize;
        loop {
            if let Step::Done(outcome) = step {
                return Ok(outcome);
            }
            tracing::debug!(?step, "advancing");
            step = self.advance(step).await?;
        }
    }

    pub async fn advance(&mut self, step: Step) -> Result<Step> {
        match step {
            Step::Initialize => {
                self.console.banner("\n📞 1. Initializing server...");
                let params = InitializeParams::from_config(self.config);
                self.send(&Request::new(INITIALIZE_ID, METHOD_INITIALIZE, params))
                    .await?;

                if !self.read_message().await.as_ref().is_some_and(is_reply) {
                    self.console
                        .failure("❌ No initialization response received");
                    return Ok(Step::Done(Outcome::NoInitResponse));
                }
                Ok(Step::Notify)
            }
            Step::Notify => {
                self.console
                    .banner("\n✅ 2. Sending initialization notification...");
                self.send(&Notification::new(METHOD_INITIALIZED)).await?;
                Ok(Step::CallTool)
            }
            Step::CallTool => {
                self.console
                    .banner("\n📨 3. Sending message without chat_id...");
                let params = CallToolParams::without_chat_id(self.config);
                self.send(&Request::new(CALL_TOOL_ID, METHOD_CALL_TOOL, params))
                    .await?;
                Ok(Step::AwaitElicitation)
            }
            Step::AwaitElicitation => {
                self.console
                    .banner("\n⏳ 4. Waiting for elicitation request...");
                tokio::time::sleep(self.config.elicitation_delay).await;

                let received = self.read_message().await;
                let message = received.as_ref().map(Message::classify);
                match message {
                    Some(Message::Request { id, method, .. })
                        if method == METHOD_ELICITATION_CREATE =>
                    {
                        self.console.line("🎯 Received elicitation request!");
                        Ok(Step::Accept(id))
                    }
                    Some(Message::Notification { method, .. })
                        if method == METHOD_ELICITATION_CREATE =>
                    {
                        Err(Error::MissingRequestId)
                    }
                    _ => {
                        self.console.failure("❌ No elicitation request received");
                        let shown = received
                            .as_ref()
                            .map_or_else(|| "null".to_string(), Value::to_string);
                        self.console.line(&format!("📋 Received instead: {shown}"));
                        Ok(Step::Done(Outcome::UnexpectedFlow(received)))
                    }
                }
            }
            Step::Accept(id) => {
                match self.config.elicitation_action {
                    ElicitAction::Accept => self
                        .console
                        .banner("\n💬 5. Responding to elicitation with chat_id..."),
                    action => self.console.banner(&format!(
                        "\n💬 5. Responding to elicitation with {action}..."
                    )),
                }
                let result = ElicitResult::from_config(self.config);
                self.send(&Response::new(id, result)).await?;
                Ok(Step::AwaitFinal)
            }
            Step::AwaitFinal => {
                self.console.banner("\n🏁 6. Waiting for final response...");
                if !self.read_message().await.as_ref().is_some_and(is_reply) {
                    self.console.failure("❌ No final response received");
                    return Ok(Step::Done(Outcome::NoFinalResponse));
                }
                self.console.success("✅ Received final response!");
                self.console
                    .success("🎉 Elicitation flow completed successfully!");
                Ok(Step::Done(Outcome::Completed))
            }
            Step::Done(outcome) => Ok(Step::Done(outcome)),
        }
    }

    /// Lines written so far, in order
    pub fn sent(&self) -> &[String] {
        self.transport.sent()
    }

    async fn send<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let line = serde_json::to_string(message)?;
        self.console.sent(&line);
        self.transport.send_line(line).await
    }

    /// Reads and parses one message.
    ///
    /// End of stream, a blank line and any read or parse failure all count
    /// as "no message"; failures are reported on the console.
    async fn read_message(&mut self) -> Option<Value> {
        let line = match self.transport.recv_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "read failed");
                self.console.line(&format!("Error reading response: {err}"));
                return None;
            }
        };
        if line.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(line.trim()) {
            Ok(message) => {
                self.console.received(&message);
                Some(message)
            }
            Err(err) => {
                tracing::warn!(error = %err, line = %line, "unparseable message");
                self.console
                    .line(&format!("Error reading response: {}", Error::Parse(err)));
                None
            }
        }
    }
}

/// Whether a message carries anything; `null`, `{}`, `[]`, `""`, `0` and
/// `false` do not count as a reply.
fn is_reply(message: &Value) -> bool {
    match message {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_messages_are_not_replies() {
        for empty in [json!(null), json!({}), json!([]), json!(""), json!(0), json!(false)] {
            assert!(!is_reply(&empty), "{empty} counted as a reply");
        }
        for reply in [json!({"jsonrpc": "2.0", "id": 1, "result": {}}), json!([{}]), json!(true)] {
            assert!(is_reply(&reply), "{reply} not counted as a reply");
        }
    }
}
