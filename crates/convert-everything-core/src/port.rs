use crate::error::PortError;

/// Identity of a head element managed by the metadata synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// `<meta name="..." content="...">`
    MetaName(&'static str),
    /// `<meta property="..." content="...">`
    MetaProperty(&'static str),
    /// `<link rel="..." href="...">`
    LinkRel(&'static str),
}

impl TagKey {
    #[must_use]
    pub fn element(self) -> &'static str {
        match self {
            Self::MetaName(_) | Self::MetaProperty(_) => "meta",
            Self::LinkRel(_) => "link",
        }
    }

    /// Attribute that identifies the element, with its value.
    #[must_use]
    pub fn selector_attribute(self) -> (&'static str, &'static str) {
        match self {
            Self::MetaName(name) => ("name", name),
            Self::MetaProperty(property) => ("property", property),
            Self::LinkRel(rel) => ("rel", rel),
        }
    }

    /// Attribute that carries the synchronized value.
    #[must_use]
    pub fn value_attribute(self) -> &'static str {
        match self {
            Self::MetaName(_) | Self::MetaProperty(_) => "content",
            Self::LinkRel(_) => "href",
        }
    }

    #[must_use]
    pub fn css_selector(self) -> String {
        let (attribute, value) = self.selector_attribute();
        format!("{}[{attribute}=\"{value}\"]", self.element())
    }
}

/// The page surface the controller and metadata synchronizer write through.
///
/// Implementations must make `ensure_tag` idempotent: the element is created at
/// most once and later calls only update its value attribute.
pub trait DocumentPort {
    /// Full current URL, including query and fragment.
    fn current_url(&self) -> String;
    fn push_history(&mut self, href: &str) -> Result<(), PortError>;
    fn replace_history(&mut self, href: &str) -> Result<(), PortError>;
    fn set_title(&mut self, title: &str) -> Result<(), PortError>;
    fn ensure_tag(&mut self, key: TagKey, value: &str) -> Result<(), PortError>;
    fn scroll_to_top(&mut self);
}
