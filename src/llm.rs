//! OpenAI-compatible chat-completions wire types and a blocking transport.
//!
//! Only the fields the tool-calling loop needs are modelled; everything else
//! in a response is ignored.

use crate::config::RunConfig;
use crate::step::StepError;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;
use ureq::Agent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(ChatRole::Assistant, content)
    }

    /// The result of a tool call, answering the call with id `call_id`.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            ..Self::text(ChatRole::Tool, content)
        }
    }

    /// An assistant turn that only requests tools.
    pub fn tool_request(calls: Vec<ToolCall>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: None,
            tool_calls: calls,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: "{}".into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments. Our tools take none, so this is never parsed.
    #[serde(default)]
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

/// A tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

impl From<&Tool> for ToolSpec {
    fn from(tool: &Tool) -> Self {
        Self {
            kind: "function",
            function: FunctionSpec {
                name: tool.name,
                description: tool.description,
                parameters: json!({ "type": "object", "properties": {} }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: &'a [ToolSpec],
}

fn no_tools(tools: &&[ToolSpec]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// The first choice's message; backends we talk to only ever return one.
    pub fn into_message(self) -> Result<Message, StepError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| StepError::invalid("response contained no choices"))
    }
}

/// Sends one chat request and returns the backend's reply.
pub trait Completion {
    fn complete(&mut self, request: &ChatRequest<'_>) -> Result<ChatResponse, StepError>;
}

/// [`Completion`] over HTTPS with bearer authentication.
pub struct HttpCompletion {
    agent: Agent,
    url: String,
    api_key: String,
}

impl HttpCompletion {
    pub fn new(config: &RunConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
        }
    }
}

impl Completion for HttpCompletion {
    fn complete(&mut self, request: &ChatRequest<'_>) -> Result<ChatResponse, StepError> {
        let mut response = self
            .agent
            .post(self.url.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(request)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if status >= 400 {
            return Err(StepError::from_status(status, &error_detail(&body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| StepError::invalid(format!("malformed completion response: {e}")))
    }
}

/// The backend's own explanation of an error response. OpenAI-style
/// backends send `{"error": {"message": ..}}`, some wrap that in an array;
/// anything else is passed through, cut short.
fn error_detail(body: &str) -> String {
    const MAX_CHARS: usize = 200;

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let message = value["error"]["message"]
            .as_str()
            .or_else(|| value[0]["error"]["message"].as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }
    body.trim().chars().take(MAX_CHARS).collect()
}
