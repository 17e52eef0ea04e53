use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_APP_NAME: &str = "Convert Everything";
pub const DEFAULT_DESCRIPTION: &str =
    "Convert text, data, images, audio and video right in your browser. Nothing is uploaded.";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub app_name: String,
    pub description: String,
    /// Origin (and optional path) prepended to the canonical link, e.g.
    /// `https://convert.example/app`. Without it the canonical link is relative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_origin: Option<String>,
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            canonical_origin: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ShellConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|error| ConfigError::InvalidJson(error.to_string()))?;
        config.normalized()
    }

    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.app_name = self.app_name.trim().to_string();
        if self.app_name.is_empty() {
            return Err(ConfigError::EmptyAppName);
        }
        self.canonical_origin = match self.canonical_origin.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_canonical_origin(raw)?),
        };
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
        Ok(self)
    }

    /// Canonical link target for an encoded query.
    #[must_use]
    pub fn canonical_href(&self, query: &str) -> String {
        match self.canonical_origin.as_deref() {
            Some(origin) => format!("{origin}/?{query}"),
            None => format!("?{query}"),
        }
    }
}

pub fn normalize_canonical_origin(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidCanonicalOrigin);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidCanonicalOrigin);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidCanonicalOrigin);
    }
    if remainder.contains(['?', '#']) {
        return Err(ConfigError::InvalidCanonicalOrigin);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ShellConfig::from_json("{}").expect("defaults");
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn canonical_origin_is_trimmed() {
        let config =
            ShellConfig::from_json(r#"{"canonical_origin":" https://convert.example/ "}"#)
                .expect("valid config");
        assert_eq!(
            config.canonical_origin.as_deref(),
            Some("https://convert.example")
        );
        assert_eq!(
            config.canonical_href("tool=qr-code"),
            "https://convert.example/?tool=qr-code"
        );
    }

    #[test]
    fn blank_canonical_origin_means_relative_links() {
        let config = ShellConfig::from_json(r#"{"canonical_origin":"   "}"#).expect("valid");
        assert_eq!(config.canonical_origin, None);
        assert_eq!(config.canonical_href("from=a&to=b"), "?from=a&to=b");
    }

    #[test]
    fn canonical_origin_requires_http_scheme_and_host() {
        assert_eq!(
            normalize_canonical_origin("convert.example"),
            Err(ConfigError::InvalidCanonicalOrigin)
        );
        assert_eq!(
            normalize_canonical_origin("https:///path"),
            Err(ConfigError::InvalidCanonicalOrigin)
        );
        assert_eq!(
            normalize_canonical_origin("https://convert.example/?x=1"),
            Err(ConfigError::InvalidCanonicalOrigin)
        );
    }

    #[test]
    fn rejects_blank_app_name_and_bad_json() {
        assert_eq!(
            ShellConfig::from_json(r#"{"app_name":"  "}"#),
            Err(ConfigError::EmptyAppName)
        );
        assert!(matches!(
            ShellConfig::from_json("not json"),
            Err(ConfigError::InvalidJson(_))
        ));
    }

    #[test]
    fn blank_log_filter_falls_back_to_default() {
        let config = ShellConfig::from_json(r#"{"log_filter":""}"#).expect("valid");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
