use crate::Config;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const JSONRPC_VERSION: &str = "2.0";

/// Id of the `initialize` request
pub const INITIALIZE_ID: i64 = 1;

/// Id of the `tools/call` request
pub const CALL_TOOL_ID: i64 = 2;

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_CALL_TOOL: &str = "tools/call";
pub const METHOD_ELICITATION_CREATE: &str = "elicitation/create";

/// JSON-RPC request id, kept exactly as received so it can be echoed back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Value);

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId(Value::from(id))
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId(Value::from(id))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outgoing request awaiting a response
#[derive(Debug, Clone, Serialize)]
pub struct Request<P> {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub method: &'static str,
    pub params: P,
}

impl<P> Request<P> {
    pub fn new(id: i64, method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: RequestId::from(id),
            method,
            params,
        }
    }
}

/// Outgoing message that expects no response
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    pub fn new(method: &'static str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params: None,
        }
    }
}

/// Outgoing successful response to a server-initiated request
#[derive(Debug, Clone, Serialize)]
pub struct Response<T> {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub result: T,
}

impl<T> Response<T> {
    pub fn new(id: RequestId, result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Marker for the client's elicitation support, serialized as `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElicitationCapability {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elicitation: Option<ElicitationCapability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: ClientCapabilities,
    pub client_info: ClientInfo,
}

impl InitializeParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            protocol_version: config.protocol_version.clone(),
            capabilities: ClientCapabilities {
                elicitation: Some(ElicitationCapability::default()),
            },
            client_info: ClientInfo {
                name: config.client_name.clone(),
                version: config.client_version.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl CallToolParams {
    /// Tool call carrying only `text`, leaving `chat_id` for the server to elicit.
    pub fn without_chat_id(config: &Config) -> Self {
        let mut arguments = Map::new();
        arguments.insert("text".to_string(), Value::from(config.message_text.clone()));
        Self {
            name: config.tool_name.clone(),
            arguments,
        }
    }
}

/// How the client answers an `elicitation/create` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ElicitAction {
    Accept,
    Decline,
    Cancel,
}

impl fmt::Display for ElicitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElicitAction::Accept => "accept",
            ElicitAction::Decline => "decline",
            ElicitAction::Cancel => "cancel",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElicitResult {
    pub action: ElicitAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl ElicitResult {
    pub fn from_config(config: &Config) -> Self {
        let content = match config.elicitation_action {
            ElicitAction::Accept => {
                let mut content = Map::new();
                content.insert("chat_id".to_string(), Value::from(config.chat_id.clone()));
                Some(Value::Object(content))
            }
            ElicitAction::Decline | ElicitAction::Cancel => None,
        };
        Self {
            action: config.elicitation_action,
            content,
        }
    }
}

/// Incoming JSON-RPC message, classified by the fields it carries
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request {
        id: RequestId,
        method: String,
        params: Option<Value>,
    },
    Notification {
        method: String,
        params: Option<Value>,
    },
    Response {
        id: Option<RequestId>,
        result: std::result::Result<Value, Value>,
    },
    Unknown(Value),
}

impl Message {
    pub fn classify(value: &Value) -> Self {
        // null or fractional ids are still ids; only a missing key is not
        let id = value.get("id").cloned().map(RequestId);
        let params = value.get("params").cloned();

        if let Some(method) = value.get("method").and_then(Value::as_str) {
            let method = method.to_string();
            return match id {
                Some(id) => Message::Request { id, method, params },
                None => Message::Notification { method, params },
            };
        }
        if let Some(result) = value.get("result") {
            return Message::Response {
                id,
                result: Ok(result.clone()),
            };
        }
        if let Some(error) = value.get("error") {
            return Message::Response {
                id,
                result: Err(error.clone()),
            };
        }
        Message::Unknown(value.clone())
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            Message::Request { method, .. } | Message::Notification { method, .. } => Some(method),
            _ => None,
        }
    }

    pub fn is_elicitation(&self) -> bool {
        self.method() == Some(METHOD_ELICITATION_CREATE)
    }
}
