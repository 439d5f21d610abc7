use crate::types::ElicitAction;
use std::{path::PathBuf, time::Duration};

/// Server binary launched when no other path is given
pub const DEFAULT_SERVER_PATH: &str = "./target/debug/vkteams-bot-mcp";

/// MCP protocol revision announced in `initialize`
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the MCP server executable
    pub server_path: PathBuf,

    /// Arguments passed to the server executable
    pub server_args: Vec<String>,

    /// Protocol version sent in the `initialize` request
    pub protocol_version: String,

    /// Client name reported in `clientInfo`
    pub client_name: String,

    /// Client version reported in `clientInfo`
    pub client_version: String,

    /// Tool invoked without its `chat_id` argument
    pub tool_name: String,

    /// `text` argument of the tool call
    pub message_text: String,

    /// Value supplied for `chat_id` when accepting the elicitation
    pub chat_id: String,

    /// How the elicitation request is answered
    pub elicitation_action: ElicitAction,

    /// Pause before reading the elicitation request
    pub elicitation_delay: Duration,

    /// Upper bound on each read, `None` blocks until a line or EOF
    pub read_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_path: PathBuf::from(DEFAULT_SERVER_PATH),
            server_args: Vec::new(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            client_name: "ElicitationTestClient".to_string(),
            client_version: "1.0.0".to_string(),
            tool_name: "send_text".to_string(),
            message_text: "Hello! This is a test message via elicitation! 🎯".to_string(),
            chat_id: "1111111@chat.agent".to_string(),
            elicitation_action: ElicitAction::Accept,

            // Gives the server time to emit its elicitation request
            elicitation_delay: Duration::from_millis(100),

            read_timeout: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, path: impl Into<PathBuf>) -> Self {
        self.server_path = path.into();
        self
    }

    pub fn with_server_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.server_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = name.into();
        self
    }

    pub fn with_message_text(mut self, text: impl Into<String>) -> Self {
        self.message_text = text.into();
        self
    }

    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = chat_id.into();
        self
    }

    pub fn with_elicitation_action(mut self, action: ElicitAction) -> Self {
        self.elicitation_action = action;
        self
    }

    pub fn with_elicitation_delay(mut self, delay: Duration) -> Self {
        self.elicitation_delay = delay;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}
