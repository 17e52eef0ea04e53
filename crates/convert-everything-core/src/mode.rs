use serde::Serialize;

/// The single active transformation: exactly one variant is live at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    GenericPair {
        source: String,
        target: String,
        /// One-shot input handed to the next mounted panel.
        #[serde(skip_serializing_if = "Option::is_none")]
        seed_input: Option<String>,
    },
    NamedTool {
        tool_id: String,
    },
}

impl Mode {
    pub fn generic(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::GenericPair {
            source: source.into(),
            target: target.into(),
            seed_input: None,
        }
    }

    pub fn tool(tool_id: impl Into<String>) -> Self {
        Self::NamedTool {
            tool_id: tool_id.into(),
        }
    }

    #[must_use]
    pub fn is_tool(&self) -> bool {
        matches!(self, Self::NamedTool { .. })
    }

    #[must_use]
    pub fn tool_id(&self) -> Option<&str> {
        match self {
            Self::NamedTool { tool_id } => Some(tool_id),
            Self::GenericPair { .. } => None,
        }
    }

    #[must_use]
    pub fn format_pair(&self) -> Option<(&str, &str)> {
        match self {
            Self::GenericPair { source, target, .. } => Some((source, target)),
            Self::NamedTool { .. } => None,
        }
    }

    /// Same mode with any pending seed removed.
    #[must_use]
    pub fn without_seed(self) -> Self {
        match self {
            Self::GenericPair { source, target, .. } => Self::GenericPair {
                source,
                target,
                seed_input: None,
            },
            tool @ Self::NamedTool { .. } => tool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_kind_tag_and_omits_empty_seed() {
        let value = serde_json::to_value(Mode::generic("base64", "text")).expect("serialize");
        assert_eq!(
            value,
            json!({ "kind": "generic_pair", "source": "base64", "target": "text" })
        );

        let value = serde_json::to_value(Mode::tool("svg-to-png")).expect("serialize");
        assert_eq!(value, json!({ "kind": "named_tool", "tool_id": "svg-to-png" }));
    }

    #[test]
    fn without_seed_keeps_the_pair() {
        let seeded = Mode::GenericPair {
            source: "text".to_string(),
            target: "hex".to_string(),
            seed_input: Some("hello".to_string()),
        };
        assert_eq!(seeded.without_seed(), Mode::generic("text", "hex"));
    }
}
