//! `workspace/executeCommand` surface.

use serde_json::Value;
use tower_lsp::lsp_types::Url;

use crate::whitespace::IssueKind;

/// Scan a document and publish what is found.
pub const DISPLAY_COMMAND: &str = "whitespaces.display";

/// Remove annotated issues from a document.
pub const FIX_COMMAND: &str = "whitespaces.fix";

pub fn all_commands() -> Vec<String> {
    vec![DISPLAY_COMMAND.to_string(), FIX_COMMAND.to_string()]
}

/// Arguments shared by both commands: `[uri, kinds?]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    pub uri: Url,
    /// Explicit kinds. `None` defers to the settings and syntax allowlist.
    pub kinds: Option<Vec<IssueKind>>,
}

/// Parse `[uri]` or `[uri, ["eof", "extra", "trailing"]]`.
pub fn parse_arguments(arguments: &[Value]) -> Result<CommandArgs, String> {
    let uri = match arguments.first() {
        Some(Value::String(uri)) => {
            Url::parse(uri).map_err(|e| format!("invalid document uri '{}': {}", uri, e))?
        }
        Some(other) => return Err(format!("expected document uri, got {}", other)),
        None => return Err("missing document uri".to_string()),
    };

    let kinds = match arguments.get(1) {
        None | Some(Value::Null) => None,
        Some(Value::Array(names)) => Some(
            names
                .iter()
                .map(|name| {
                    name.as_str()
                        .and_then(IssueKind::from_name)
                        .ok_or_else(|| format!("unknown issue kind: {}", name))
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(other) => return Err(format!("expected list of issue kinds, got {}", other)),
    };

    Ok(CommandArgs { uri, kinds })
}
