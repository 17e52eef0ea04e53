//! Page title, description, social tags and canonical link for the active mode.

use crate::codec;
use crate::config::ShellConfig;
use crate::error::PortError;
use crate::mode::Mode;
use crate::port::{DocumentPort, TagKey};
use crate::registry::CapabilityRegistry;

pub const DESCRIPTION_TAG: TagKey = TagKey::MetaName("description");
pub const OG_TITLE_TAG: TagKey = TagKey::MetaProperty("og:title");
pub const OG_DESCRIPTION_TAG: TagKey = TagKey::MetaProperty("og:description");
pub const OG_URL_TAG: TagKey = TagKey::MetaProperty("og:url");
pub const TWITTER_CARD_TAG: TagKey = TagKey::MetaName("twitter:card");
pub const TWITTER_TITLE_TAG: TagKey = TagKey::MetaName("twitter:title");
pub const CANONICAL_LINK: TagKey = TagKey::LinkRel("canonical");

pub const TWITTER_CARD_KIND: &str = "summary";

#[must_use]
pub fn mode_label<R: CapabilityRegistry + ?Sized>(registry: &R, mode: &Mode) -> String {
    match mode {
        Mode::NamedTool { tool_id } => registry
            .resolve(tool_id)
            .map_or_else(|| tool_id.clone(), |tool| tool.label.to_string()),
        Mode::GenericPair { source, target, .. } => {
            let source = registry.format_label(source).unwrap_or(source.as_str());
            let target = registry.format_label(target).unwrap_or(target.as_str());
            format!("{source}→{target}")
        }
    }
}

#[must_use]
pub fn page_title<R: CapabilityRegistry + ?Sized>(
    registry: &R,
    mode: &Mode,
    config: &ShellConfig,
) -> String {
    format!("{} - {}", mode_label(registry, mode), config.app_name)
}

/// Rewrites the title and the fixed tag set. Safe to call any number of times:
/// tags are created once by the port and updated in place afterwards.
pub fn sync_document_metadata<R, P>(
    port: &mut P,
    registry: &R,
    mode: &Mode,
    config: &ShellConfig,
) -> Result<(), PortError>
where
    R: CapabilityRegistry + ?Sized,
    P: DocumentPort + ?Sized,
{
    let title = page_title(registry, mode, config);
    let canonical = config.canonical_href(&codec::encode(mode));

    port.set_title(&title)?;
    port.ensure_tag(DESCRIPTION_TAG, &config.description)?;
    port.ensure_tag(OG_TITLE_TAG, &title)?;
    port.ensure_tag(OG_DESCRIPTION_TAG, &config.description)?;
    port.ensure_tag(OG_URL_TAG, &canonical)?;
    port.ensure_tag(TWITTER_CARD_TAG, TWITTER_CARD_KIND)?;
    port.ensure_tag(TWITTER_TITLE_TAG, &title)?;
    port.ensure_tag(CANONICAL_LINK, &canonical)?;
    Ok(())
}
