//! Read-only view of the converter catalog.
//!
//! The concrete converters live outside this crate; the core only asks which
//! identifiers exist, which targets a format can reach, and how to label them.

/// A named single-purpose tool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ToolSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub accepts: &'static str,
    pub emits: &'static str,
}

impl ToolSpec {
    #[must_use]
    pub fn converts(&self, accepts: &str, emits: &str) -> bool {
        self.accepts == accepts && self.emits == emits
    }
}

/// A generic-pipeline format and the ordered formats it converts into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormatSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub targets: &'static [&'static str],
}

pub trait CapabilityRegistry {
    fn format_ids(&self) -> Vec<&str>;
    fn tool_ids(&self) -> Vec<&str>;
    fn resolve(&self, tool_id: &str) -> Option<ToolSpec>;
    /// Ordered; the first entry is the default target for `format_id`.
    fn targets_of(&self, format_id: &str) -> Vec<&str>;
    fn format_label(&self, format_id: &str) -> Option<&str>;

    fn list_identifiers(&self) -> Vec<&str> {
        let mut identifiers = self.format_ids();
        identifiers.extend(self.tool_ids());
        identifiers
    }

    fn is_known_tool(&self, tool_id: &str) -> bool {
        self.resolve(tool_id).is_some()
    }
}

impl<R: CapabilityRegistry + ?Sized> CapabilityRegistry for &R {
    fn format_ids(&self) -> Vec<&str> {
        (**self).format_ids()
    }

    fn tool_ids(&self) -> Vec<&str> {
        (**self).tool_ids()
    }

    fn resolve(&self, tool_id: &str) -> Option<ToolSpec> {
        (**self).resolve(tool_id)
    }

    fn targets_of(&self, format_id: &str) -> Vec<&str> {
        (**self).targets_of(format_id)
    }

    fn format_label(&self, format_id: &str) -> Option<&str> {
        (**self).format_label(format_id)
    }
}

pub const TOOL_PDF_PAGE_COUNT: &str = "pdf-page-count";
pub const TOOL_SVG_TO_PNG: &str = "svg-to-png";
pub const TOOL_IMAGE_RESIZE: &str = "image-resize";
pub const TOOL_VIDEO_TO_AUDIO: &str = "video-to-audio";
pub const TOOL_AUDIO_TO_MP3: &str = "audio-to-mp3";

const FORMAT_SPECS: [FormatSpec; 11] = [
    FormatSpec {
        id: "text",
        label: "Text",
        targets: &["base64", "hex", "url", "binary", "html-entities"],
    },
    FormatSpec {
        id: "base64",
        label: "Base64",
        targets: &["text", "hex"],
    },
    FormatSpec {
        id: "hex",
        label: "Hex",
        targets: &["text", "base64"],
    },
    FormatSpec {
        id: "url",
        label: "URL-encoded",
        targets: &["text"],
    },
    FormatSpec {
        id: "binary",
        label: "Binary",
        targets: &["text"],
    },
    FormatSpec {
        id: "html-entities",
        label: "HTML entities",
        targets: &["text"],
    },
    FormatSpec {
        id: "json",
        label: "JSON",
        targets: &["yaml", "csv"],
    },
    FormatSpec {
        id: "yaml",
        label: "YAML",
        targets: &["json"],
    },
    FormatSpec {
        id: "csv",
        label: "CSV",
        targets: &["json"],
    },
    FormatSpec {
        id: "markdown",
        label: "Markdown",
        targets: &["html"],
    },
    FormatSpec {
        id: "html",
        label: "HTML",
        targets: &[],
    },
];

const TOOL_SPECS: [ToolSpec; 8] = [
    ToolSpec {
        id: TOOL_PDF_PAGE_COUNT,
        label: "PDF page count",
        accepts: "pdf",
        emits: "text",
    },
    ToolSpec {
        id: TOOL_SVG_TO_PNG,
        label: "SVG to PNG",
        accepts: "svg",
        emits: "png",
    },
    ToolSpec {
        id: TOOL_IMAGE_RESIZE,
        label: "Image resize",
        accepts: "image",
        emits: "image",
    },
    ToolSpec {
        id: TOOL_VIDEO_TO_AUDIO,
        label: "Extract audio from video",
        accepts: "video",
        emits: "audio",
    },
    ToolSpec {
        id: TOOL_AUDIO_TO_MP3,
        label: "Audio to MP3",
        accepts: "audio",
        emits: "mp3",
    },
    ToolSpec {
        id: "qr-code",
        label: "QR code",
        accepts: "text",
        emits: "png",
    },
    ToolSpec {
        id: "hash-generator",
        label: "Hash generator",
        accepts: "text",
        emits: "text",
    },
    ToolSpec {
        id: "json-formatter",
        label: "JSON formatter",
        accepts: "json",
        emits: "json",
    },
];

/// The catalog shipped with the web shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinRegistry;

impl BuiltinRegistry {
    pub fn format_specs() -> &'static [FormatSpec] {
        &FORMAT_SPECS
    }

    pub fn tool_specs() -> &'static [ToolSpec] {
        &TOOL_SPECS
    }

    fn format_spec(format_id: &str) -> Option<&'static FormatSpec> {
        FORMAT_SPECS.iter().find(|spec| spec.id == format_id)
    }
}

impl CapabilityRegistry for BuiltinRegistry {
    fn format_ids(&self) -> Vec<&str> {
        FORMAT_SPECS.iter().map(|spec| spec.id).collect()
    }

    fn tool_ids(&self) -> Vec<&str> {
        TOOL_SPECS.iter().map(|spec| spec.id).collect()
    }

    fn resolve(&self, tool_id: &str) -> Option<ToolSpec> {
        TOOL_SPECS.iter().find(|spec| spec.id == tool_id).copied()
    }

    fn targets_of(&self, format_id: &str) -> Vec<&str> {
        Self::format_spec(format_id)
            .map(|spec| spec.targets.to_vec())
            .unwrap_or_default()
    }

    fn format_label(&self, format_id: &str) -> Option<&str> {
        Self::format_spec(format_id).map(|spec| spec.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_target_is_a_known_format() {
        let registry = BuiltinRegistry;
        let formats = registry.format_ids();
        for format in &formats {
            for target in registry.targets_of(format) {
                assert!(formats.contains(&target), "{format} -> {target} is dangling");
            }
        }
    }

    #[test]
    fn tool_and_format_identifiers_do_not_collide() {
        let registry = BuiltinRegistry;
        let formats = registry.format_ids();
        for tool in registry.tool_ids() {
            assert!(!formats.contains(&tool), "{tool} is both a tool and a format");
        }
    }

    #[test]
    fn list_identifiers_puts_formats_before_tools() {
        let registry = BuiltinRegistry;
        let identifiers = registry.list_identifiers();
        assert_eq!(identifiers.first().copied(), Some("text"));
        assert_eq!(identifiers.last().copied(), Some("json-formatter"));
        assert_eq!(
            identifiers.len(),
            BuiltinRegistry::format_specs().len() + BuiltinRegistry::tool_specs().len()
        );
    }

    #[test]
    fn resolve_answers_accepts_and_emits() {
        let tool = BuiltinRegistry.resolve(TOOL_SVG_TO_PNG).expect("svg tool");
        assert!(tool.converts("svg", "png"));
        assert!(!tool.converts("png", "svg"));
        assert!(BuiltinRegistry.resolve("text").is_none());
    }

    #[test]
    fn unknown_format_has_no_targets_or_label() {
        assert!(BuiltinRegistry.targets_of("klingon").is_empty());
        assert_eq!(BuiltinRegistry.format_label("klingon"), None);
        assert_eq!(BuiltinRegistry.format_label("base64"), Some("Base64"));
    }
}
