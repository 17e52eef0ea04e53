//! Pure mapping between the address bar and [`Mode`].
//!
//! Canonical form is the query string: `tool=<id>` or `from=<id>&to=<id>`, with an
//! optional one-shot `input=<text>` honored on decode only. The legacy `#tool/<id>`
//! fragment is read for old links and never written.

use url::{Url, form_urlencoded};

use crate::mode::Mode;
use crate::registry::CapabilityRegistry;

pub const DEFAULT_SOURCE_FORMAT: &str = "text";
/// Used only when the default source itself has no targets.
pub const FALLBACK_TARGET_FORMAT: &str = "base64";

pub const PARAM_TOOL: &str = "tool";
pub const PARAM_FROM: &str = "from";
pub const PARAM_TO: &str = "to";
pub const PARAM_INPUT: &str = "input";

const LEGACY_TOOL_FRAGMENT_PREFIX: &str = "tool/";
const RELATIVE_URL_BASE: &str = "http://localhost/";

/// Serializable projection of a [`Mode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub query: String,
}

impl NavigationSnapshot {
    #[must_use]
    pub fn from_mode(mode: &Mode) -> Self {
        Self {
            query: encode(mode),
        }
    }

    /// Relative URL for history writes. Replacing only the query also drops any
    /// fragment, so a legacy `#tool/..` entry is never carried forward.
    #[must_use]
    pub fn href(&self) -> String {
        format!("?{}", self.query)
    }
}

#[derive(Debug, Default)]
struct NavigationParams {
    tool: Option<String>,
    from: Option<String>,
    to: Option<String>,
    input: Option<String>,
    legacy_tool: Option<String>,
}

fn parse_navigation(url: &str) -> Option<NavigationParams> {
    let base = Url::parse(RELATIVE_URL_BASE).ok()?;
    let parsed = Url::options().base_url(Some(&base)).parse(url.trim()).ok()?;

    let mut params = NavigationParams::default();
    for (key, value) in parsed.query_pairs() {
        if value.is_empty() {
            continue;
        }
        let slot = match key.as_ref() {
            PARAM_TOOL => &mut params.tool,
            PARAM_FROM => &mut params.from,
            PARAM_TO => &mut params.to,
            PARAM_INPUT => &mut params.input,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    params.legacy_tool = parsed
        .fragment()
        .and_then(|fragment| fragment.strip_prefix(LEGACY_TOOL_FRAGMENT_PREFIX))
        .filter(|tool_id| !tool_id.is_empty())
        .map(ToString::to_string);

    Some(params)
}

/// Decodes a full URL or a relative `?query#fragment` into a validated mode.
pub fn decode<R: CapabilityRegistry + ?Sized>(url: &str, registry: &R) -> Mode {
    let Some(params) = parse_navigation(url) else {
        return default_mode(registry);
    };

    if let Some(tool_id) = params
        .tool
        .filter(|tool_id| registry.is_known_tool(tool_id))
    {
        return Mode::NamedTool { tool_id };
    }
    if let Some(tool_id) = params
        .legacy_tool
        .filter(|tool_id| registry.is_known_tool(tool_id))
    {
        return Mode::NamedTool { tool_id };
    }

    let (source, target) = validate_pair(registry, params.from.as_deref(), params.to.as_deref());
    Mode::GenericPair {
        source,
        target,
        seed_input: params.input,
    }
}

/// Validates a `from`/`to` pair against the registry.
///
/// A present `from` with no targets resets the whole pair to the default; a
/// missing `from` falls back to the default source and still honors a valid `to`.
pub fn validate_pair<R: CapabilityRegistry + ?Sized>(
    registry: &R,
    from: Option<&str>,
    to: Option<&str>,
) -> (String, String) {
    let (source, to) = match from {
        Some(from) if !registry.targets_of(from).is_empty() => (from, to),
        Some(_) => (DEFAULT_SOURCE_FORMAT, None),
        None => (DEFAULT_SOURCE_FORMAT, to),
    };

    let targets = registry.targets_of(source);
    let target = to
        .filter(|to| targets.contains(to))
        .or_else(|| targets.first().copied())
        .unwrap_or(FALLBACK_TARGET_FORMAT);

    (source.to_string(), target.to_string())
}

pub fn default_mode<R: CapabilityRegistry + ?Sized>(registry: &R) -> Mode {
    let (source, target) = validate_pair(registry, None, None);
    Mode::generic(source, target)
}

/// Query string (without `?`) for `mode`. Never emits `input` or a fragment.
#[must_use]
pub fn encode(mode: &Mode) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    match mode {
        Mode::NamedTool { tool_id } => {
            serializer.append_pair(PARAM_TOOL, tool_id);
        }
        Mode::GenericPair { source, target, .. } => {
            serializer
                .append_pair(PARAM_FROM, source)
                .append_pair(PARAM_TO, target);
        }
    }
    serializer.finish()
}

#[must_use]
pub fn history_href(mode: &Mode) -> String {
    NavigationSnapshot::from_mode(mode).href()
}
