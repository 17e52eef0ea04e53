use super::*;

use convert_everything_core::{DocumentPort, PortError, TagKey};

/// Browser implementation of the document port.
pub(super) struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl WebDocument {
    pub(super) fn new(window: web_sys::Window, document: web_sys::Document) -> Self {
        Self { window, document }
    }

    fn history(&self) -> Result<web_sys::History, PortError> {
        self.window
            .history()
            .map_err(|_| PortError::History("history is unavailable".to_string()))
    }
}

impl DocumentPort for WebDocument {
    fn current_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn push_history(&mut self, href: &str) -> Result<(), PortError> {
        self.history()?
            .push_state_with_url(&JsValue::NULL, "", Some(href))
            .map_err(|error| PortError::History(js_error_message(&error)))
    }

    fn replace_history(&mut self, href: &str) -> Result<(), PortError> {
        self.history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(href))
            .map_err(|error| PortError::History(js_error_message(&error)))
    }

    fn set_title(&mut self, title: &str) -> Result<(), PortError> {
        self.document.set_title(title);
        Ok(())
    }

    fn ensure_tag(&mut self, key: TagKey, value: &str) -> Result<(), PortError> {
        let tag_error = |message: String| PortError::Tag {
            tag: key.css_selector(),
            message,
        };
        let existing = self
            .document
            .query_selector(&key.css_selector())
            .map_err(|error| tag_error(js_error_message(&error)))?;
        let element = match existing {
            Some(element) => element,
            None => {
                let head = self.document.head().ok_or(PortError::DocumentUnavailable)?;
                let element = self
                    .document
                    .create_element(key.element())
                    .map_err(|error| tag_error(js_error_message(&error)))?;
                let (attribute, identity) = key.selector_attribute();
                element
                    .set_attribute(attribute, identity)
                    .map_err(|error| tag_error(js_error_message(&error)))?;
                head.append_child(&element)
                    .map_err(|error| tag_error(js_error_message(&error)))?;
                element
            }
        };
        element
            .set_attribute(key.value_attribute(), value)
            .map_err(|error| tag_error(js_error_message(&error)))
    }

    fn scroll_to_top(&mut self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

pub(super) fn document_root() -> Option<web_sys::Element> {
    web_sys::window()?.document()?.document_element()
}

pub(super) fn set_root_flag(attribute: &str, enabled: bool) {
    let Some(root) = document_root() else {
        return;
    };
    let _ = if enabled {
        root.set_attribute(attribute, "true")
    } else {
        root.remove_attribute(attribute)
    };
}

/// Tells the rendering layer to re-read `shell_state_json`.
pub(super) fn notify_state_changed() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(event) = web_sys::Event::new(STATE_CHANGED_EVENT) else {
        return;
    };
    let _ = window.dispatch_event(&event);
}

/// The config global may be a JSON string or a plain object.
pub(super) fn read_config_global() -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    if let Some(raw) = value.as_string() {
        return Some(raw);
    }
    js_sys::JSON::stringify(&value).ok()?.as_string()
}

pub(super) fn active_element_accepts_text(document: &web_sys::Document) -> bool {
    let Some(active) = document.active_element() else {
        return false;
    };

    if crate::boot::content_editable_accepts_text(active.get_attribute("contenteditable").as_deref())
    {
        return true;
    }

    let tag = active.tag_name().to_ascii_lowercase();
    if tag == "textarea" {
        return true;
    }
    if tag != "input" {
        return false;
    }

    if let Ok(input) = active.dyn_into::<web_sys::HtmlInputElement>() {
        crate::boot::is_text_input_type(&input.type_())
    } else {
        true
    }
}

pub(super) fn js_error_message(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(error, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| "unknown javascript error".to_string())
}
