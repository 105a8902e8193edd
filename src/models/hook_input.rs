//! `PreToolUse` hook payload.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// One intercepted tool call as delivered by the host runtime.
///
/// ```json
/// {
///   "tool_name": "mcp__mcp-funnel__bridge_tool_request",
///   "tool_input": {
///     "tool": "graphiti__add_memory",
///     "arguments": {"name": "...", "episode_body": "..."}
///   }
/// }
/// ```
///
/// Only the outer document must be well formed. Missing or mistyped fields
/// inside it read as empty values so unexpected host payloads pass through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreToolUseInput {
    /// Name of the tool the host is about to call.
    pub tool_name: String,
    /// Forwarded request; empty when `tool_input` is not an object.
    pub bridge: BridgeRequest,
}

impl PreToolUseInput {
    /// Parses the raw hook payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the payload is not JSON or not a
    /// JSON object.
    pub fn parse(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| Error::InvalidInput(format!("hook payload is not JSON: {e}")))?;
        let Value::Object(root) = value else {
            return Err(Error::InvalidInput(
                "hook payload is not a JSON object".to_string(),
            ));
        };

        let tool_name = root
            .get("tool_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let bridge = root
            .get("tool_input")
            .and_then(Value::as_object)
            .map(BridgeRequest::from_tool_input)
            .unwrap_or_default();

        Ok(Self { tool_name, bridge })
    }
}

/// The inner request a bridge tool forwards to another MCP server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeRequest {
    /// Target tool, e.g. `graphiti__search_nodes`.
    pub tool: String,
    /// Arguments for the target tool.
    pub arguments: Map<String, Value>,
}

impl BridgeRequest {
    fn from_tool_input(tool_input: &Map<String, Value>) -> Self {
        Self {
            tool: tool_input
                .get("tool")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            arguments: tool_input
                .get("arguments")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Returns a string argument. Non-string values read as absent.
    #[must_use]
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }

    /// Returns a string argument if it has non-whitespace content.
    #[must_use]
    pub fn non_blank_arg(&self, key: &str) -> Option<&str> {
        self.str_arg(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns a raw argument value.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Classifies the target tool.
    #[must_use]
    pub fn operation(&self) -> GraphitiOperation {
        GraphitiOperation::classify(&self.tool)
    }
}

/// Graphiti operations the guard has rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphitiOperation {
    /// `add_memory`: write an episode.
    AddMemory,
    /// `clear_graph`: drop a group's graph.
    ClearGraph,
    /// `search_nodes`: entity search.
    SearchNodes,
    /// Any other Graphiti tool.
    Other,
}

impl GraphitiOperation {
    /// Classifies a tool name by case-insensitive substring.
    ///
    /// Bridge tool names carry a server prefix (`graphiti__add_memory`,
    /// `mcp__graphiti__add_memory`), so exact matching is not possible.
    #[must_use]
    pub fn classify(tool: &str) -> Self {
        let tool = tool.to_lowercase();
        if tool.contains("add_memory") {
            Self::AddMemory
        } else if tool.contains("clear_graph") {
            Self::ClearGraph
        } else if tool.contains("search_nodes") {
            Self::SearchNodes
        } else {
            Self::Other
        }
    }

    /// Operation name as used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AddMemory => "add_memory",
            Self::ClearGraph => "clear_graph",
            Self::SearchNodes => "search_nodes",
            Self::Other => "other",
        }
    }
}
