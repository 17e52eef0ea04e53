//! The single authority over the active [`Mode`].
//!
//! Every transition updates in-memory state and writes exactly one history
//! entry through the [`DocumentPort`]; cold load and history pops read the URL
//! and write nothing.

use serde::Serialize;

use crate::codec::{self, history_href};
use crate::mode::Mode;
use crate::port::DocumentPort;
use crate::registry::CapabilityRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWrite {
    Push,
    Replace,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    /// The active mode differs from before the call.
    pub changed: bool,
    pub history: HistoryWrite,
}

impl TransitionOutcome {
    pub const IGNORED: Self = Self {
        changed: false,
        history: HistoryWrite::None,
    };
}

#[derive(Debug)]
pub struct ModeController<R, P> {
    registry: R,
    port: P,
    current: Mode,
    last_pair: (String, String),
    surface_epoch: u64,
}

impl<R: CapabilityRegistry, P: DocumentPort> ModeController<R, P> {
    /// Cold load: decodes the port's current URL. Writes no history.
    pub fn initialize(registry: R, port: P) -> Self {
        let current = codec::decode(&port.current_url(), &registry);
        let last_pair = match current.format_pair() {
            Some((source, target)) => (source.to_string(), target.to_string()),
            None => codec::validate_pair(&registry, None, None),
        };
        tracing::debug!(mode = %codec::encode(&current), "mode controller initialized");
        Self {
            registry,
            port,
            current,
            last_pair,
            surface_epoch: 0,
        }
    }

    pub fn current(&self) -> &Mode {
        &self.current
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Increments on every mode change; the conversion surface is keyed on it.
    pub fn surface_epoch(&self) -> u64 {
        self.surface_epoch
    }

    /// Disjoint borrows for the metadata synchronizer.
    pub(crate) fn metadata_parts(&mut self) -> (&mut P, &R, &Mode) {
        (&mut self.port, &self.registry, &self.current)
    }

    /// The generic pair that `exit_tool` returns to.
    pub fn last_generic(&self) -> Mode {
        Mode::generic(self.last_pair.0.clone(), self.last_pair.1.clone())
    }

    pub fn select_tool(&mut self, tool_id: &str) -> TransitionOutcome {
        if !self.registry.is_known_tool(tool_id) {
            tracing::debug!(tool_id, "ignoring unknown tool selection");
            return TransitionOutcome::IGNORED;
        }
        let changed = self.set_current(Mode::tool(tool_id));
        self.write_history(HistoryWrite::Push);
        self.port.scroll_to_top();
        TransitionOutcome {
            changed,
            history: HistoryWrite::Push,
        }
    }

    /// Generic-mode edits rewrite the current entry instead of growing history.
    pub fn select_formats(&mut self, source: &str, target: &str) -> TransitionOutcome {
        let (source, target) = codec::validate_pair(&self.registry, Some(source), Some(target));
        let changed = self.set_current(Mode::generic(source, target));
        self.write_history(HistoryWrite::Replace);
        TransitionOutcome {
            changed,
            history: HistoryWrite::Replace,
        }
    }

    pub fn exit_tool(&mut self) -> TransitionOutcome {
        if !self.current.is_tool() {
            return TransitionOutcome::IGNORED;
        }
        let changed = self.set_current(self.last_generic());
        self.write_history(HistoryWrite::Push);
        TransitionOutcome {
            changed,
            history: HistoryWrite::Push,
        }
    }

    /// Hands out the pending seed once; later calls in the same mode return `None`.
    pub fn consume_seed_input(&mut self) -> Option<String> {
        match &mut self.current {
            Mode::GenericPair { seed_input, .. } => seed_input.take(),
            Mode::NamedTool { .. } => None,
        }
    }

    /// Back/forward: adopt whatever the URL now says. Never writes history.
    pub fn on_history_pop(&mut self) -> TransitionOutcome {
        let next = codec::decode(&self.port.current_url(), &self.registry).without_seed();
        let changed = self.set_current(next);
        TransitionOutcome {
            changed,
            history: HistoryWrite::None,
        }
    }

    fn set_current(&mut self, next: Mode) -> bool {
        if let Some((source, target)) = next.format_pair() {
            self.last_pair = (source.to_string(), target.to_string());
        }
        if next == self.current {
            return false;
        }
        tracing::debug!(
            from = %codec::encode(&self.current),
            to = %codec::encode(&next),
            "mode transition"
        );
        self.current = next;
        self.surface_epoch = self.surface_epoch.wrapping_add(1);
        true
    }

    fn write_history(&mut self, write: HistoryWrite) {
        let href = history_href(&self.current);
        let result = match write {
            HistoryWrite::Push => self.port.push_history(&href),
            HistoryWrite::Replace => self.port.replace_history(&href),
            HistoryWrite::None => Ok(()),
        };
        if let Err(error) = result {
            tracing::warn!(%error, %href, "history write failed; keeping in-memory mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;
    use crate::registry::{BuiltinRegistry, TOOL_SVG_TO_PNG};

    fn controller_at(url: &str) -> ModeController<BuiltinRegistry, MemoryDocument> {
        ModeController::initialize(BuiltinRegistry, MemoryDocument::new(url))
    }

    #[test]
    fn initialize_decodes_without_writing_history() {
        let controller = controller_at("https://convert.example/?from=base64&to=text");
        assert_eq!(controller.current(), &Mode::generic("base64", "text"));
        assert_eq!(controller.port().push_count(), 0);
        assert_eq!(controller.port().replace_count(), 0);
        assert_eq!(controller.surface_epoch(), 0);
    }

    #[test]
    fn tool_round_trip_through_escape_restores_pair() {
        let mut controller = controller_at("https://convert.example/?from=base64&to=text");

        let outcome = controller.select_tool(TOOL_SVG_TO_PNG);
        assert_eq!(outcome.history, HistoryWrite::Push);
        assert!(outcome.changed);
        assert_eq!(
            controller.port().current_url(),
            "https://convert.example/?tool=svg-to-png"
        );
        assert_eq!(controller.port().history_len(), 2);
        assert_eq!(controller.port().scroll_to_top_count(), 1);

        controller.exit_tool();
        assert_eq!(
            controller.port().current_url(),
            "https://convert.example/?from=base64&to=text"
        );
        assert_eq!(controller.port().history_len(), 3);
        assert_eq!(controller.current(), &Mode::generic("base64", "text"));
    }

    #[test]
    fn consecutive_format_selections_replace_one_entry() {
        let mut controller = controller_at("https://convert.example/");
        for (source, target) in [("text", "hex"), ("hex", "text"), ("json", "yaml"), ("yaml", "json")]
        {
            let outcome = controller.select_formats(source, target);
            assert_eq!(outcome.history, HistoryWrite::Replace);
        }

        assert_eq!(controller.port().history_len(), 1);
        assert_eq!(controller.port().push_count(), 0);
        assert_eq!(controller.port().replace_count(), 4);
        assert_eq!(
            controller.port().current_url(),
            "https://convert.example/?from=yaml&to=json"
        );
    }

    #[test]
    fn consecutive_tool_selections_push_every_time() {
        let mut controller = controller_at("https://convert.example/");
        let tools = ["qr-code", "qr-code", TOOL_SVG_TO_PNG, "image-resize", "hash-generator"];
        for tool in tools {
            controller.select_tool(tool);
        }

        assert_eq!(controller.port().push_count(), tools.len());
        assert_eq!(controller.port().history_len(), tools.len() + 1);
    }

    #[test]
    fn repeated_tool_selection_pushes_but_does_not_remount() {
        let mut controller = controller_at("https://convert.example/");
        assert!(controller.select_tool("qr-code").changed);
        let epoch = controller.surface_epoch();

        let outcome = controller.select_tool("qr-code");
        assert!(!outcome.changed);
        assert_eq!(outcome.history, HistoryWrite::Push);
        assert_eq!(controller.surface_epoch(), epoch);
    }

    #[test]
    fn select_formats_validates_like_decode() {
        let mut controller = controller_at("https://convert.example/");

        controller.select_formats("json", "text");
        assert_eq!(controller.current(), &Mode::generic("json", "yaml"));

        controller.select_formats("klingon", "hex");
        assert_eq!(controller.current(), &Mode::generic("text", "base64"));
    }

    #[test]
    fn reachable_pairs_always_have_valid_targets() {
        fn prop(steps: Vec<(String, String, u8)>) -> bool {
            let registry = BuiltinRegistry;
            let formats = registry.format_ids();
            let tools = registry.tool_ids();
            let mut controller = controller_at("https://convert.example/");

            for (source, target, action) in steps {
                let source = if action % 3 == 0 {
                    formats[usize::from(action) % formats.len()].to_string()
                } else {
                    source
                };
                match action % 4 {
                    0 | 1 => {
                        controller.select_formats(&source, &target);
                    }
                    2 => {
                        controller.select_tool(tools[usize::from(action) % tools.len()]);
                    }
                    _ => {
                        controller.exit_tool();
                    }
                }

                let valid = match controller.current() {
                    Mode::GenericPair { source, target, .. } => {
                        registry.targets_of(source).contains(&target.as_str())
                    }
                    Mode::NamedTool { .. } => {
                        let last = controller.last_generic();
                        let (source, target) = last.format_pair().unwrap_or_default();
                        registry.targets_of(source).contains(&target)
                    }
                };
                if !valid {
                    return false;
                }
            }
            true
        }

        quickcheck::quickcheck(prop as fn(Vec<(String, String, u8)>) -> bool);
    }

    #[test]
    fn unknown_tool_is_a_no_op() {
        let mut controller = controller_at("https://convert.example/?from=hex&to=text");
        assert_eq!(controller.select_tool("teleport"), TransitionOutcome::IGNORED);
        assert_eq!(controller.port().history_len(), 1);
        assert_eq!(controller.current(), &Mode::generic("hex", "text"));
    }

    #[test]
    fn exit_tool_outside_tool_mode_is_a_no_op() {
        let mut controller = controller_at("https://convert.example/?from=hex&to=text");
        assert_eq!(controller.exit_tool(), TransitionOutcome::IGNORED);
        assert_eq!(controller.port().push_count(), 0);
    }

    #[test]
    fn exit_tool_returns_to_pair_retained_across_tools() {
        let mut controller = controller_at("https://convert.example/?from=text&to=hex");
        controller.select_tool("qr-code");
        controller.select_tool(TOOL_SVG_TO_PNG);
        controller.exit_tool();
        assert_eq!(controller.current(), &Mode::generic("text", "hex"));
    }

    #[test]
    fn cold_load_in_tool_mode_exits_to_default_pair() {
        let mut controller = controller_at("https://convert.example/?tool=qr-code");
        controller.exit_tool();
        assert_eq!(controller.current(), &Mode::generic("text", "base64"));
    }

    #[test]
    fn history_pop_restores_mode_without_writing() {
        let mut controller = controller_at("https://convert.example/?from=base64&to=text");
        controller.select_tool(TOOL_SVG_TO_PNG);
        let pushes = controller.port().push_count();

        assert!(controller.port_mut().back());
        let outcome = controller.on_history_pop();

        assert!(outcome.changed);
        assert_eq!(outcome.history, HistoryWrite::None);
        assert_eq!(controller.current(), &Mode::generic("base64", "text"));
        assert_eq!(controller.port().push_count(), pushes);
        assert_eq!(controller.port().replace_count(), 0);

        assert!(controller.port_mut().forward());
        controller.on_history_pop();
        assert_eq!(controller.current(), &Mode::tool(TOOL_SVG_TO_PNG));
        assert_eq!(controller.port().history_len(), 2);
    }

    #[test]
    fn history_pop_updates_exit_target() {
        let mut controller = controller_at("https://convert.example/?from=json&to=csv");
        controller.select_tool("qr-code");
        controller.select_formats("hex", "text");
        controller.select_tool("hash-generator");

        controller.port_mut().back();
        controller.on_history_pop();
        assert_eq!(controller.current(), &Mode::generic("hex", "text"));

        controller.port_mut().back();
        controller.on_history_pop();
        assert_eq!(controller.current(), &Mode::generic("json", "csv"));
        assert_eq!(controller.last_generic(), Mode::generic("json", "csv"));
    }

    #[test]
    fn seed_is_handed_out_once() {
        let mut controller =
            controller_at("https://convert.example/?from=text&to=hex&input=hello");
        assert_eq!(controller.consume_seed_input().as_deref(), Some("hello"));
        assert_eq!(controller.consume_seed_input(), None);
        assert_eq!(controller.current(), &Mode::generic("text", "hex"));
    }

    #[test]
    fn history_pop_never_reapplies_a_seed() {
        let mut controller =
            controller_at("https://convert.example/?from=text&to=hex&input=hello");
        controller.consume_seed_input();
        controller.select_tool("qr-code");

        controller.port_mut().back();
        controller.on_history_pop();
        assert_eq!(controller.consume_seed_input(), None);
    }

    #[test]
    fn failed_history_write_keeps_in_memory_transition() {
        let mut document = MemoryDocument::new("https://convert.example/?from=text&to=hex");
        document.fail_history_writes = true;
        let mut controller = ModeController::initialize(BuiltinRegistry, document);

        let outcome = controller.select_tool("qr-code");
        assert!(outcome.changed);
        assert_eq!(controller.current(), &Mode::tool("qr-code"));
        assert_eq!(controller.port().history_len(), 1);
    }
}
