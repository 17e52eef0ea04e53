//! Message-passing layer that wires the controller, router, metadata
//! synchronizer, install offer and persisted flags into one shell.
//!
//! Hosts feed platform events into [`ShellApp::dispatch`] and call the direct
//! operations from their rendering layer; nothing else mutates the mode.

use serde::Serialize;

use crate::codec;
use crate::config::ShellConfig;
use crate::controller::{ModeController, TransitionOutcome};
use crate::flags::{FlagStore, PersistedFlags, Theme};
use crate::install::InstallPrompt;
use crate::metadata::sync_document_metadata;
use crate::mode::Mode;
use crate::port::DocumentPort;
use crate::registry::CapabilityRegistry;
use crate::router::{InputEvent, InputRouter, RouteOutcome, RouterEffect};
use crate::surface::ConversionSurface;

/// Diagnostics view of the shell, serialized for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellSnapshot {
    pub mode: Mode,
    pub query: String,
    pub surface: ConversionSurface,
    pub dragging: bool,
    pub help_open: bool,
    pub flags: PersistedFlags,
    pub install_available: bool,
}

pub struct ShellApp<R, P, S, O> {
    controller: ModeController<R, P>,
    router: InputRouter,
    store: S,
    flags: PersistedFlags,
    install: InstallPrompt<O>,
    surface: ConversionSurface,
    config: ShellConfig,
}

impl<R, P, S, O> ShellApp<R, P, S, O>
where
    R: CapabilityRegistry,
    P: DocumentPort,
    S: FlagStore,
{
    /// Cold load: decode the URL, read persisted flags once, and write the
    /// initial metadata. No history entry is written.
    pub fn boot(registry: R, port: P, store: S, config: ShellConfig) -> Self {
        let flags = PersistedFlags::load(&store);
        let controller = ModeController::initialize(registry, port);
        let mut surface = ConversionSurface::default();
        surface.mount(controller.surface_epoch());

        let mut app = Self {
            controller,
            router: InputRouter::default(),
            store,
            install: InstallPrompt::new(&flags),
            flags,
            surface,
            config,
        };
        app.sync_metadata();
        tracing::info!(
            mode = %codec::encode(app.mode()),
            theme = app.flags.theme.as_str(),
            "shell booted"
        );
        app
    }

    pub fn mode(&self) -> &Mode {
        self.controller.current()
    }

    pub fn controller(&self) -> &ModeController<R, P> {
        &self.controller
    }

    pub fn port(&self) -> &P {
        self.controller.port()
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn flags(&self) -> PersistedFlags {
        self.flags
    }

    pub fn surface(&self) -> &ConversionSurface {
        &self.surface
    }

    pub fn dispatch(&mut self, event: InputEvent) -> RouteOutcome {
        let outcome = self.router.handle(event, &mut self.controller);
        if outcome.effects.contains(&RouterEffect::ToggleTheme) {
            self.toggle_theme();
        }
        self.after_transition(outcome.transition);
        outcome
    }

    pub fn select_tool(&mut self, tool_id: &str) -> TransitionOutcome {
        let outcome = self.controller.select_tool(tool_id);
        self.after_transition(Some(outcome));
        outcome
    }

    pub fn select_formats(&mut self, source: &str, target: &str) -> TransitionOutcome {
        let outcome = self.controller.select_formats(source, target);
        self.after_transition(Some(outcome));
        outcome
    }

    pub fn exit_tool(&mut self) -> TransitionOutcome {
        let outcome = self.controller.exit_tool();
        self.after_transition(Some(outcome));
        outcome
    }

    pub fn consume_seed_input(&mut self) -> Option<String> {
        self.controller.consume_seed_input()
    }

    pub fn report_surface_fault(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        self.surface.report_fault(epoch, message)
    }

    pub fn retry_surface(&mut self) {
        self.surface.retry();
    }

    /// Returns `true` when the host should suppress the platform install UI.
    pub fn capture_install_offer(&mut self, offer: O) -> bool {
        let captured = self.install.capture(offer);
        tracing::debug!(captured, "install offer received");
        captured
    }

    pub fn install_available(&self) -> bool {
        self.install.is_available()
    }

    pub fn accept_install_offer(&mut self) -> Option<O> {
        self.install.accept()
    }

    pub fn dismiss_install_offer(&mut self) {
        if let Err(error) = self.install.dismiss(&mut self.flags, &mut self.store) {
            tracing::warn!(%error, "failed to persist install dismissal");
        }
    }

    pub fn should_show_tip(&self) -> bool {
        !self.flags.tip_seen
    }

    pub fn dismiss_tip(&mut self) {
        if let Err(error) = self.flags.mark_tip_seen(&mut self.store) {
            tracing::warn!(%error, "failed to persist tip dismissal");
        }
    }

    pub fn theme(&self) -> Theme {
        self.flags.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        match self.flags.toggle_theme(&mut self.store) {
            Ok(theme) => theme,
            Err(error) => {
                tracing::warn!(%error, "failed to persist theme choice");
                self.flags.theme
            }
        }
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            mode: self.mode().clone(),
            query: codec::encode(self.mode()),
            surface: self.surface.clone(),
            dragging: self.router.is_dragging(),
            help_open: self.router.help_open(),
            flags: self.flags,
            install_available: self.install.is_available(),
        }
    }

    fn after_transition(&mut self, transition: Option<TransitionOutcome>) {
        if !transition.is_some_and(|outcome| outcome.changed) {
            return;
        }
        self.surface.mount(self.controller.surface_epoch());
        self.sync_metadata();
    }

    fn sync_metadata(&mut self) {
        let (port, registry, mode) = self.controller.metadata_parts();
        if let Err(error) = sync_document_metadata(port, registry, mode, &self.config) {
            tracing::warn!(%error, "failed to sync document metadata");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{THEME_KEY, TIP_SEEN_KEY};
    use crate::memory::{MemoryDocument, MemoryFlagStore};
    use crate::metadata::CANONICAL_LINK;
    use crate::registry::{BuiltinRegistry, TOOL_SVG_TO_PNG};
    use crate::router::{DroppedFile, FocusContext, KeyPress, KEY_ESCAPE};

    type TestShell = ShellApp<BuiltinRegistry, MemoryDocument, MemoryFlagStore, &'static str>;

    fn boot_at(url: &str) -> TestShell {
        ShellApp::boot(
            BuiltinRegistry,
            MemoryDocument::new(url),
            MemoryFlagStore::default(),
            ShellConfig::default(),
        )
    }

    fn escape() -> InputEvent {
        InputEvent::KeyDown(KeyPress::plain(KEY_ESCAPE, FocusContext::Page))
    }

    #[test]
    fn boot_writes_metadata_but_no_history() {
        let shell = boot_at("https://convert.example/?from=base64&to=text");
        assert_eq!(shell.port().title(), "Base64→Text - Convert Everything");
        assert_eq!(shell.port().tag_value(CANONICAL_LINK), Some("?from=base64&to=text"));
        assert_eq!(shell.port().history_len(), 1);
        assert_eq!(shell.port().push_count() + shell.port().replace_count(), 0);
    }

    #[test]
    fn tool_then_escape_keeps_title_and_history_in_step() {
        let mut shell = boot_at("https://convert.example/?from=base64&to=text");

        shell.select_tool(TOOL_SVG_TO_PNG);
        assert_eq!(shell.port().current_url(), "https://convert.example/?tool=svg-to-png");
        assert_eq!(shell.port().title(), "SVG to PNG - Convert Everything");
        assert_eq!(shell.port().history_len(), 2);

        shell.dispatch(escape());
        assert_eq!(
            shell.port().current_url(),
            "https://convert.example/?from=base64&to=text"
        );
        assert_eq!(shell.port().history_len(), 3);
        assert_eq!(shell.mode(), &Mode::generic("base64", "text"));
        assert_eq!(shell.port().title(), "Base64→Text - Convert Everything");
    }

    #[test]
    fn mode_change_remounts_faulted_surface() {
        let mut shell = boot_at("https://convert.example/");
        let epoch = shell.surface().epoch();
        assert!(shell.report_surface_fault(epoch, "render failed"));

        shell.select_formats("hex", "text");

        assert_ne!(shell.surface().epoch(), epoch);
        assert_eq!(shell.surface().fault(), None);
    }

    #[test]
    fn retry_clears_fault_without_touching_mode() {
        let mut shell = boot_at("https://convert.example/?tool=qr-code");
        let epoch = shell.surface().epoch();
        shell.report_surface_fault(epoch, "render failed");

        shell.retry_surface();

        assert_eq!(shell.surface().fault(), None);
        assert_eq!(shell.mode(), &Mode::tool("qr-code"));
        assert_eq!(shell.port().history_len(), 1);
    }

    #[test]
    fn dropped_file_routes_through_dispatch() {
        let mut shell = boot_at("https://convert.example/");
        let outcome = shell.dispatch(InputEvent::Drop {
            files: vec![DroppedFile {
                mime_type: "image/svg+xml".to_string(),
                name: "logo.svg".to_string(),
            }],
        });

        assert!(outcome.mode_changed());
        assert_eq!(shell.port().title(), "SVG to PNG - Convert Everything");

        let outcome = shell.dispatch(InputEvent::Drop {
            files: vec![DroppedFile {
                mime_type: "application/pdf".to_string(),
                name: "doc.pdf".to_string(),
            }],
        });
        assert_eq!(outcome.transition, None);
        assert_eq!(shell.mode(), &Mode::tool(TOOL_SVG_TO_PNG));
    }

    #[test]
    fn history_pop_resyncs_metadata() {
        let mut shell = boot_at("https://convert.example/?from=json&to=yaml");
        shell.select_tool("qr-code");

        assert_eq!(shell.port().title(), "QR code - Convert Everything");

        // A browser moves the cursor before firing popstate.
        assert!(shell.controller.port_mut().back());
        shell.dispatch(InputEvent::HistoryPop);

        assert_eq!(shell.mode(), &Mode::generic("json", "yaml"));
        assert_eq!(shell.port().title(), "JSON→YAML - Convert Everything");
        assert_eq!(shell.port().history_len(), 2);
    }

    #[test]
    fn install_offer_is_captured_once_per_session() {
        let mut shell = boot_at("https://convert.example/");
        assert!(shell.capture_install_offer("offer-1"));
        assert!(shell.install_available());

        shell.dismiss_install_offer();
        assert!(!shell.install_available());
        assert!(!shell.capture_install_offer("offer-2"));
        assert!(!shell.install_available());
        assert!(shell.flags().install_dismissed);
    }

    #[test]
    fn accepted_offer_is_handed_back_once() {
        let mut shell = boot_at("https://convert.example/");
        shell.capture_install_offer("offer");
        assert_eq!(shell.accept_install_offer(), Some("offer"));
        assert_eq!(shell.accept_install_offer(), None);
        assert!(!shell.install_available());
    }

    #[test]
    fn dismissed_install_flag_survives_reload() {
        let mut store = MemoryFlagStore::default();
        store.write("convert-everything.install-dismissed", "true").expect("write");
        let mut shell: TestShell = ShellApp::boot(
            BuiltinRegistry,
            MemoryDocument::default(),
            store,
            ShellConfig::default(),
        );
        assert!(!shell.capture_install_offer("offer"));
    }

    #[test]
    fn tip_dismissal_is_persisted_once() {
        let mut shell = boot_at("https://convert.example/");
        assert!(shell.should_show_tip());
        shell.dismiss_tip();
        shell.dismiss_tip();
        assert!(!shell.should_show_tip());
        assert_eq!(shell.store.write_count(TIP_SEEN_KEY), 1);
    }

    #[test]
    fn theme_chord_toggles_and_persists_theme() {
        let mut shell = boot_at("https://convert.example/");
        let press = KeyPress {
            ctrl: true,
            shift: true,
            ..KeyPress::plain("L", FocusContext::Page)
        };

        shell.dispatch(InputEvent::KeyDown(press));

        assert_eq!(shell.theme(), Theme::Dark);
        assert_eq!(shell.store.value(THEME_KEY), Some("dark"));
    }

    #[test]
    fn seed_reaches_the_first_panel_only() {
        let mut shell = boot_at("https://convert.example/?from=text&to=hex&input=hi");
        assert_eq!(shell.consume_seed_input().as_deref(), Some("hi"));
        assert_eq!(shell.consume_seed_input(), None);
    }

    #[test]
    fn snapshot_serializes_for_diagnostics() {
        let mut shell = boot_at("https://convert.example/?tool=qr-code");
        shell.dispatch(InputEvent::DragEnter);
        let value = serde_json::to_value(shell.snapshot()).expect("serialize");

        assert_eq!(value["query"], "tool=qr-code");
        assert_eq!(value["mode"]["kind"], "named_tool");
        assert_eq!(value["dragging"], true);
        assert_eq!(value["flags"]["theme"], "light");
    }
}
