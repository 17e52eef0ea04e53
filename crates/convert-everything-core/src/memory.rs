//! In-memory implementations of the document and flag-store ports.
//!
//! Used by headless hosts and by the tests; the history model mirrors the
//! browser's session history (push truncates forward entries, replace rewrites
//! the current one, back/forward move the cursor without writing).

use std::collections::HashMap;

use url::Url;

use crate::error::PortError;
use crate::flags::FlagStore;
use crate::port::{DocumentPort, TagKey};

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    entries: Vec<String>,
    index: usize,
    title: String,
    tags: Vec<(TagKey, String)>,
    tags_created: usize,
    push_count: usize,
    replace_count: usize,
    scroll_to_top_count: usize,
    pub fail_history_writes: bool,
}

impl MemoryDocument {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: vec![url.into()],
            index: 0,
            title: String::new(),
            tags: Vec::new(),
            tags_created: 0,
            push_count: 0,
            replace_count: 0,
            scroll_to_top_count: 0,
            fail_history_writes: false,
        }
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn history_index(&self) -> usize {
        self.index
    }

    /// Moves the cursor back one entry, like the browser back button.
    /// The caller is responsible for delivering the pop to the controller.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn tag_value(&self, key: TagKey) -> Option<&str> {
        self.tags
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn tag_count(&self, key: TagKey) -> usize {
        self.tags.iter().filter(|(existing, _)| *existing == key).count()
    }

    #[must_use]
    pub fn tags_created(&self) -> usize {
        self.tags_created
    }

    #[must_use]
    pub fn push_count(&self) -> usize {
        self.push_count
    }

    #[must_use]
    pub fn replace_count(&self) -> usize {
        self.replace_count
    }

    #[must_use]
    pub fn scroll_to_top_count(&self) -> usize {
        self.scroll_to_top_count
    }

    fn resolve(&self, href: &str) -> String {
        let current = self.current_url();
        Url::parse(&current)
            .and_then(|base| base.join(href))
            .map(String::from)
            .unwrap_or_else(|_| href.to_string())
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new("http://localhost/")
    }
}

impl DocumentPort for MemoryDocument {
    fn current_url(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_default()
    }

    fn push_history(&mut self, href: &str) -> Result<(), PortError> {
        if self.fail_history_writes {
            return Err(PortError::History("push rejected".to_string()));
        }
        let resolved = self.resolve(href);
        self.entries.truncate(self.index + 1);
        self.entries.push(resolved);
        self.index = self.entries.len() - 1;
        self.push_count += 1;
        Ok(())
    }

    fn replace_history(&mut self, href: &str) -> Result<(), PortError> {
        if self.fail_history_writes {
            return Err(PortError::History("replace rejected".to_string()));
        }
        let resolved = self.resolve(href);
        if let Some(entry) = self.entries.get_mut(self.index) {
            *entry = resolved;
        }
        self.replace_count += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), PortError> {
        self.title = title.to_string();
        Ok(())
    }

    fn ensure_tag(&mut self, key: TagKey, value: &str) -> Result<(), PortError> {
        if let Some((_, existing)) = self.tags.iter_mut().find(|(existing, _)| *existing == key) {
            *existing = value.to_string();
            return Ok(());
        }
        self.tags.push((key, value.to_string()));
        self.tags_created += 1;
        Ok(())
    }

    fn scroll_to_top(&mut self) {
        self.scroll_to_top_count += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    values: HashMap<String, String>,
    writes: HashMap<String, usize>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryFlagStore {
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn write_count(&self, key: &str) -> usize {
        self.writes.get(key).copied().unwrap_or(0)
    }
}

impl FlagStore for MemoryFlagStore {
    fn read(&self, key: &str) -> Result<Option<String>, PortError> {
        if self.fail_reads {
            return Err(PortError::StorageUnavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PortError> {
        if self.fail_writes {
            return Err(PortError::Storage {
                key: key.to_string(),
                message: "write rejected".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        *self.writes.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
