#![allow(clippy::needless_pass_by_value)]
#![cfg_attr(test, allow(clippy::expect_used))]

#[cfg(any(target_arch = "wasm32", test))]
mod boot;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use convert_everything_core::{
        BuiltinRegistry, CapabilityRegistry, InputEvent, RouteOutcome, RouterEffect, ShellApp,
        Theme, TransitionOutcome,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use crate::boot::{BootError, config_from_raw, drop_target_tool};
    use crate::wasm_constants::*;

    mod dom;
    mod install;
    mod listeners;
    mod logging;
    mod storage;

    use dom::*;
    use listeners::install_listeners;
    use storage::LocalFlagStore;

    type WebShell = ShellApp<BuiltinRegistry, WebDocument, LocalFlagStore, JsValue>;

    thread_local! {
        static SHELL: RefCell<Option<WebShell>> = const { RefCell::new(None) };
        static DRAG_ENTER_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static DRAG_LEAVE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static DRAG_OVER_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static DROP_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static PASTE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static KEYDOWN_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>> = const { RefCell::new(None) };
        static POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static INSTALL_PROMPT_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Err(error) = boot() {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "convert-everything boot failed: {error}"
            )));
        }
    }

    #[wasm_bindgen]
    pub fn shell_state_json() -> String {
        with_shell(|shell| serde_json::to_string(&shell.snapshot()))
            .and_then(Result::ok)
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Known format and tool identifiers, formats first.
    #[wasm_bindgen]
    pub fn registry_json() -> String {
        serde_json::to_string(&BuiltinRegistry.list_identifiers())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Tool the drop policy would open for a file, if any.
    #[wasm_bindgen]
    pub fn classify_file(mime_type: String, file_name: String) -> Option<String> {
        drop_target_tool(&mime_type, &file_name)
    }

    #[wasm_bindgen]
    pub fn select_tool(tool_id: String) -> bool {
        run_transition(|shell| shell.select_tool(&tool_id))
    }

    #[wasm_bindgen]
    pub fn select_formats(source: String, target: String) -> bool {
        run_transition(|shell| shell.select_formats(&source, &target))
    }

    #[wasm_bindgen]
    pub fn exit_tool() -> bool {
        run_transition(WebShell::exit_tool)
    }

    /// Hands the one-shot seed to the first generic panel mount.
    #[wasm_bindgen]
    pub fn take_seed_input() -> Option<String> {
        with_shell(WebShell::consume_seed_input).flatten()
    }

    #[wasm_bindgen]
    pub fn surface_epoch() -> f64 {
        with_shell(|shell| shell.surface().epoch() as f64).unwrap_or(0.0)
    }

    #[wasm_bindgen]
    pub fn report_surface_fault(epoch: f64, message: String) -> bool {
        let recorded =
            with_shell(|shell| shell.report_surface_fault(epoch as u64, message)).unwrap_or(false);
        if recorded {
            notify_state_changed();
        }
        recorded
    }

    #[wasm_bindgen]
    pub fn retry_surface() {
        with_shell(WebShell::retry_surface);
        notify_state_changed();
    }

    #[wasm_bindgen]
    pub fn install_available() -> bool {
        with_shell(|shell| shell.install_available()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn accept_install_offer() {
        if let Some(offer) = with_shell(WebShell::accept_install_offer).flatten() {
            install::invoke_offer(offer);
        }
        notify_state_changed();
    }

    #[wasm_bindgen]
    pub fn dismiss_install_offer() {
        with_shell(WebShell::dismiss_install_offer);
        notify_state_changed();
    }

    #[wasm_bindgen]
    pub fn should_show_tip() -> bool {
        with_shell(|shell| shell.should_show_tip()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn dismiss_tip() {
        with_shell(WebShell::dismiss_tip);
    }

    #[wasm_bindgen]
    pub fn toggle_theme() -> String {
        let theme = with_shell(WebShell::toggle_theme).unwrap_or_default();
        apply_theme(theme);
        theme.as_str().to_string()
    }

    fn boot() -> Result<(), BootError> {
        if SHELL.with(|slot| slot.borrow().is_some()) {
            return Err(BootError::AlreadyBooted);
        }

        let raw_config = read_config_global();
        let parsed = config_from_raw(raw_config.as_deref());
        let config = parsed.clone().unwrap_or_default();
        logging::install(&config.log_filter);
        if let Err(error) = parsed {
            tracing::warn!(%error, "ignoring invalid shell config");
        }

        let window = web_sys::window().ok_or(BootError::WindowUnavailable)?;
        let document = window.document().ok_or(BootError::DocumentUnavailable)?;

        let port = WebDocument::new(window.clone(), document.clone());
        let store = LocalFlagStore::from_window(&window);
        let shell = ShellApp::boot(BuiltinRegistry, port, store, config);
        let theme = shell.theme();
        SHELL.with(|slot| *slot.borrow_mut() = Some(shell));

        apply_theme(theme);
        install_listeners(&window, &document);
        notify_state_changed();
        Ok(())
    }

    fn with_shell<T>(f: impl FnOnce(&mut WebShell) -> T) -> Option<T> {
        SHELL.with(|slot| slot.borrow_mut().as_mut().map(f))
    }

    fn run_transition(f: impl FnOnce(&mut WebShell) -> TransitionOutcome) -> bool {
        let changed = with_shell(f).is_some_and(|outcome| outcome.changed);
        if changed {
            notify_state_changed();
        }
        changed
    }

    /// Routes one platform event and applies the host effects it requests.
    fn dispatch_event(event: InputEvent, platform_event: &web_sys::Event) {
        let Some(outcome) = with_shell(|shell| shell.dispatch(event)) else {
            return;
        };
        apply_route_outcome(&outcome, platform_event);
    }

    fn apply_route_outcome(outcome: &RouteOutcome, platform_event: &web_sys::Event) {
        for effect in &outcome.effects {
            match *effect {
                RouterEffect::PreventDefault => platform_event.prevent_default(),
                RouterEffect::DraggingChanged(dragging) => {
                    set_root_flag(DRAGGING_ATTRIBUTE, dragging);
                }
                RouterEffect::HelpOverlayChanged(open) => set_root_flag(HELP_OPEN_ATTRIBUTE, open),
                RouterEffect::ToggleTheme => {
                    let theme = with_shell(|shell| shell.theme()).unwrap_or_default();
                    apply_theme(theme);
                }
            }
        }
        if outcome.mode_changed() {
            notify_state_changed();
        }
    }

    fn apply_theme(theme: Theme) {
        if let Some(root) = document_root() {
            let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        }
    }
}
