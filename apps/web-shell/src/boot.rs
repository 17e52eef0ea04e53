use convert_everything_core::{ConfigError, ShellConfig, classify_file};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum BootError {
    #[error("window is unavailable")]
    WindowUnavailable,
    #[error("document is unavailable")]
    DocumentUnavailable,
    #[error("shell is already running")]
    AlreadyBooted,
}

/// Parses the host-provided config. A missing or blank value means defaults.
pub(crate) fn config_from_raw(raw: Option<&str>) -> Result<ShellConfig, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(ShellConfig::default()),
        Some(raw) => ShellConfig::from_json(raw),
    }
}

/// Owned form of the drop policy lookup for the JS boundary.
pub(crate) fn drop_target_tool(mime_type: &str, file_name: &str) -> Option<String> {
    classify_file(mime_type, file_name).map(str::to_string)
}

pub(crate) fn content_editable_accepts_text(attribute: Option<&str>) -> bool {
    attribute.is_some_and(|value| !value.trim().eq_ignore_ascii_case("false"))
}

pub(crate) fn is_text_input_type(input_type: &str) -> bool {
    matches!(
        input_type.trim().to_ascii_lowercase().as_str(),
        "" | "text" | "search" | "email" | "password" | "tel" | "url" | "number"
    )
}
