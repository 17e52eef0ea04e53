//! Ambient input routing.
//!
//! Each platform event is translated into at most one [`ModeController`] call or
//! one local UI toggle. Malformed or empty payloads are ignored; nothing here
//! fails.

use crate::controller::{ModeController, TransitionOutcome};
use crate::port::DocumentPort;
use crate::registry::{
    CapabilityRegistry, TOOL_AUDIO_TO_MP3, TOOL_IMAGE_RESIZE, TOOL_PDF_PAGE_COUNT,
    TOOL_SVG_TO_PNG, TOOL_VIDEO_TO_AUDIO,
};

pub const KEY_ESCAPE: &str = "Escape";
pub const KEY_HELP: &str = "?";
pub const THEME_TOGGLE_KEY: &str = "l";
pub const PASTED_IMAGE_TOOL: &str = TOOL_IMAGE_RESIZE;

/// File-type to tool classification. First matching rule wins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DropRule {
    pub tool_id: &'static str,
    pub mime_types: &'static [&'static str],
    pub mime_prefix: Option<&'static str>,
    pub extensions: &'static [&'static str],
}

impl DropRule {
    #[must_use]
    pub fn matches(&self, mime_type: &str, file_name: &str) -> bool {
        let mime_type = normalize_mime(mime_type);
        if !mime_type.is_empty() {
            if self.mime_types.contains(&mime_type.as_str()) {
                return true;
            }
            if self
                .mime_prefix
                .is_some_and(|prefix| mime_type.starts_with(prefix))
            {
                return true;
            }
        }
        file_extension(file_name)
            .is_some_and(|extension| self.extensions.contains(&extension.as_str()))
    }
}

pub const DROP_POLICY: [DropRule; 5] = [
    DropRule {
        tool_id: TOOL_PDF_PAGE_COUNT,
        mime_types: &["application/pdf"],
        mime_prefix: None,
        extensions: &["pdf"],
    },
    DropRule {
        tool_id: TOOL_SVG_TO_PNG,
        mime_types: &["image/svg+xml"],
        mime_prefix: None,
        extensions: &["svg"],
    },
    DropRule {
        tool_id: TOOL_IMAGE_RESIZE,
        mime_types: &[],
        mime_prefix: Some("image/"),
        extensions: &["png", "jpg", "jpeg", "gif", "webp", "bmp", "avif", "tif", "tiff"],
    },
    DropRule {
        tool_id: TOOL_VIDEO_TO_AUDIO,
        mime_types: &[],
        mime_prefix: Some("video/"),
        extensions: &["mp4", "webm", "mov", "mkv", "avi", "m4v"],
    },
    DropRule {
        tool_id: TOOL_AUDIO_TO_MP3,
        mime_types: &[],
        mime_prefix: Some("audio/"),
        extensions: &["wav", "ogg", "oga", "flac", "m4a", "aac", "opus", "mp3"],
    },
];

/// Classifies a file by declared content type and filename extension.
#[must_use]
pub fn classify_file(mime_type: &str, file_name: &str) -> Option<&'static str> {
    DROP_POLICY
        .iter()
        .find(|rule| rule.matches(mime_type, file_name))
        .map(|rule| rule.tool_id)
}

fn normalize_mime(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn file_extension(file_name: &str) -> Option<String> {
    let (stem, extension) = file_name.trim().rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub mime_type: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
}

impl ClipboardItem {
    #[must_use]
    pub fn is_image(&self) -> bool {
        normalize_mime(&self.mime_type).starts_with("image/")
    }
}

/// Where keyboard focus sat when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusContext {
    Page,
    EditableControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    pub repeat: bool,
    pub focus: FocusContext,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>, focus: FocusContext) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            repeat: false,
            focus,
        }
    }

    fn is_theme_chord(&self) -> bool {
        (self.ctrl || self.meta)
            && self.shift
            && !self.alt
            && self.key.eq_ignore_ascii_case(THEME_TOGGLE_KEY)
    }

    fn is_help_key(&self) -> bool {
        self.key == KEY_HELP && !self.ctrl && !self.meta && !self.alt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop { files: Vec<DroppedFile> },
    Paste {
        items: Vec<ClipboardItem>,
        focus: FocusContext,
    },
    KeyDown(KeyPress),
    HistoryPop,
}

/// Work the host must perform after an event is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterEffect {
    PreventDefault,
    DraggingChanged(bool),
    HelpOverlayChanged(bool),
    ToggleTheme,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOutcome {
    pub effects: Vec<RouterEffect>,
    pub transition: Option<TransitionOutcome>,
}

impl RouteOutcome {
    #[must_use]
    pub fn mode_changed(&self) -> bool {
        self.transition.is_some_and(|outcome| outcome.changed)
    }

    #[must_use]
    pub fn prevents_default(&self) -> bool {
        self.effects.contains(&RouterEffect::PreventDefault)
    }

    fn effect(&mut self, effect: RouterEffect) {
        self.effects.push(effect);
    }
}

/// Nested enter/leave depth. Enter and leave fire once per traversed element,
/// so only the zero crossing says whether a drag is over the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragCounter {
    depth: i32,
}

impl DragCounter {
    #[must_use]
    pub fn depth(self) -> i32 {
        self.depth
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        self.depth > 0
    }

    /// Returns the new flag value when this enter crossed zero.
    pub fn enter(&mut self) -> Option<bool> {
        let was = self.is_dragging();
        self.depth = self.depth.saturating_add(1);
        self.crossing(was)
    }

    pub fn leave(&mut self) -> Option<bool> {
        let was = self.is_dragging();
        self.depth = self.depth.saturating_sub(1);
        self.crossing(was)
    }

    pub fn reset(&mut self) -> Option<bool> {
        let was = self.is_dragging();
        self.depth = 0;
        self.crossing(was)
    }

    fn crossing(self, was: bool) -> Option<bool> {
        let now = self.is_dragging();
        (now != was).then_some(now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    drag: DragCounter,
    help_open: bool,
}

impl InputRouter {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    #[must_use]
    pub fn drag_depth(&self) -> i32 {
        self.drag.depth()
    }

    #[must_use]
    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn handle<R, P>(
        &mut self,
        event: InputEvent,
        controller: &mut ModeController<R, P>,
    ) -> RouteOutcome
    where
        R: CapabilityRegistry,
        P: DocumentPort,
    {
        let mut outcome = RouteOutcome::default();
        match event {
            InputEvent::DragEnter => {
                if let Some(dragging) = self.drag.enter() {
                    outcome.effect(RouterEffect::DraggingChanged(dragging));
                }
            }
            InputEvent::DragLeave => {
                if let Some(dragging) = self.drag.leave() {
                    outcome.effect(RouterEffect::DraggingChanged(dragging));
                }
            }
            InputEvent::DragOver => outcome.effect(RouterEffect::PreventDefault),
            InputEvent::Drop { files } => {
                outcome.effect(RouterEffect::PreventDefault);
                if let Some(dragging) = self.drag.reset() {
                    outcome.effect(RouterEffect::DraggingChanged(dragging));
                }
                route_drop(&files, controller, &mut outcome);
            }
            InputEvent::Paste { items, focus } => {
                route_paste(&items, focus, controller, &mut outcome);
            }
            InputEvent::KeyDown(press) => self.route_key(&press, controller, &mut outcome),
            InputEvent::HistoryPop => {
                outcome.transition = Some(controller.on_history_pop());
            }
        }
        outcome
    }

    fn route_key<R, P>(
        &mut self,
        press: &KeyPress,
        controller: &mut ModeController<R, P>,
        outcome: &mut RouteOutcome,
    ) where
        R: CapabilityRegistry,
        P: DocumentPort,
    {
        if press.repeat {
            return;
        }

        if press.key == KEY_ESCAPE {
            if self.help_open {
                self.help_open = false;
                outcome.effect(RouterEffect::HelpOverlayChanged(false));
            }
            if controller.current().is_tool() {
                outcome.transition = Some(controller.exit_tool());
            }
            return;
        }

        if press.is_theme_chord() {
            outcome.effect(RouterEffect::PreventDefault);
            outcome.effect(RouterEffect::ToggleTheme);
            return;
        }

        if press.is_help_key() && press.focus == FocusContext::Page {
            self.help_open = !self.help_open;
            outcome.effect(RouterEffect::HelpOverlayChanged(self.help_open));
        }
    }
}

fn route_drop<R, P>(
    files: &[DroppedFile],
    controller: &mut ModeController<R, P>,
    outcome: &mut RouteOutcome,
) where
    R: CapabilityRegistry,
    P: DocumentPort,
{
    if controller.current().is_tool() {
        tracing::debug!("ignoring drop while a tool is active");
        return;
    }
    let Some(file) = files.first() else {
        return;
    };
    let Some(tool_id) = classify_file(&file.mime_type, &file.name) else {
        tracing::debug!(mime = %file.mime_type, "dropped file matches no tool");
        return;
    };
    outcome.transition = Some(controller.select_tool(tool_id));
}

fn route_paste<R, P>(
    items: &[ClipboardItem],
    focus: FocusContext,
    controller: &mut ModeController<R, P>,
    outcome: &mut RouteOutcome,
) where
    R: CapabilityRegistry,
    P: DocumentPort,
{
    if controller.current().is_tool() || focus == FocusContext::EditableControl {
        return;
    }
    if !items.iter().any(ClipboardItem::is_image) {
        return;
    }
    outcome.effect(RouterEffect::PreventDefault);
    outcome.transition = Some(controller.select_tool(PASTED_IMAGE_TOOL));
}
