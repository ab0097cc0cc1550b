use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use super::errors::{AgentError, AgentResult};
use super::messages::ToolDefinition;
use crate::domain::crew::ToolKind;

/// A capability an agent can invoke while working on a task
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name advertised to the model
    fn name(&self) -> &str;

    fn description(&self) -> String;

    /// JSON schema of the arguments object
    fn parameters(&self) -> serde_json::Value;

    async fn invoke(&self, arguments: serde_json::Value) -> AgentResult<String>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description(),
            parameters: self.parameters(),
        }
    }
}

/// Reads a required string argument from a tool call
pub fn string_argument(
    tool: &str,
    arguments: &serde_json::Value,
    key: &str,
) -> AgentResult<String> {
    arguments
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AgentError::ToolFailed {
            tool: tool.to_string(),
            message: format!("missing required argument '{}'", key),
        })
}

/// Concrete tools behind each capability reference
#[derive(Clone, Default)]
pub struct ToolBox {
    tools: HashMap<ToolKind, Arc<dyn Tool>>,
}

impl ToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, kind: ToolKind, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(kind, tool);
        self
    }

    pub fn get(&self, kind: ToolKind) -> Option<Arc<dyn Tool>> {
        self.tools.get(&kind).cloned()
    }

    /// Resolves a set of capability references to tools
    ///
    /// A reference without a registered tool is a wiring mistake and fails
    /// the task up front rather than at first use.
    pub fn resolve(&self, kinds: &BTreeSet<ToolKind>) -> AgentResult<Vec<Arc<dyn Tool>>> {
        kinds
            .iter()
            .map(|kind| {
                self.get(*kind).ok_or_else(|| {
                    AgentError::ConfigError(format!("No tool registered for '{}'", kind))
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.tools.keys().collect();
        kinds.sort();
        f.debug_struct("ToolBox").field("tools", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> String {
            "Echoes its input".to_string()
        }

        fn parameters(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn invoke(&self, arguments: serde_json::Value) -> AgentResult<String> {
            string_argument(self.name(), &arguments, "text")
        }
    }

    #[test]
    fn resolve_returns_registered_tools() {
        let toolbox = ToolBox::new().with_tool(ToolKind::WebSearch, Arc::new(EchoTool));

        let tools = toolbox
            .resolve(&BTreeSet::from([ToolKind::WebSearch]))
            .unwrap();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].definition().name, "echo");
    }

    #[test]
    fn resolve_fails_for_unregistered_kind() {
        let toolbox = ToolBox::new();

        let err = toolbox
            .resolve(&BTreeSet::from([ToolKind::ScrapeWebsite]))
            .err().unwrap();

        assert!(err.to_string().contains("scrape_website"));
    }

    #[tokio::test]
    async fn missing_argument_is_a_tool_error() {
        let err = EchoTool.invoke(json!({"text": "  "})).await.unwrap_err();

        assert!(matches!(err, AgentError::ToolFailed { .. }));
        assert_eq!(EchoTool.invoke(json!({"text": "hi"})).await.unwrap(), "hi");
    }
}
