//! Provider-agnostic chat types for tool-calling (function-calling) requests.

use serde::Serialize;
use serde_json::Value;

/// A `(system, user)` prompt pair sent as one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: Option<String>,
    pub user: String,
}

/// A function/tool the model may call, described by a JSON schema.
///
/// # Example
/// ```
/// use ai_llm_service::ToolSpec;
/// use serde_json::json;
///
/// let tool = ToolSpec {
///     name: "lookup".into(),
///     description: "Look something up".into(),
///     parameters: json!({ "type": "object", "properties": {} }),
/// };
/// assert_eq!(tool.name, "lookup");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

/// How the model is allowed to use the offered tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// The model decides between calling a tool and replying with text.
    #[default]
    Auto,
    /// The model must call a tool.
    Required,
}

impl ToolChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::Required => "required",
        }
    }
}

/// A single tool invocation emitted by the model.
///
/// `arguments` is the raw JSON text of the arguments object, exactly as the
/// provider returned it (Ollama objects are re-serialized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: String,
}

/// Raw outcome of a tool-enabled chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The model answered through one or more tool calls, in emission order.
    ToolCalls(Vec<ToolCall>),
    /// The model ignored the tools and replied with free text.
    Text(String),
}
