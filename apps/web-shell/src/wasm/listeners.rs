use super::*;

use convert_everything_core::{ClipboardItem, DroppedFile, FocusContext, KeyPress};
use wasm_bindgen::closure::WasmClosure;

/// Registers the document and window listeners once per page.
pub(super) fn install_listeners(window: &web_sys::Window, document: &web_sys::Document) {
    install_event_handler(&DRAG_ENTER_HANDLER, document, "dragenter", |event| {
        dispatch_event(InputEvent::DragEnter, &event);
    });
    install_event_handler(&DRAG_LEAVE_HANDLER, document, "dragleave", |event| {
        dispatch_event(InputEvent::DragLeave, &event);
    });
    install_event_handler(&DRAG_OVER_HANDLER, document, "dragover", |event| {
        dispatch_event(InputEvent::DragOver, &event);
    });
    install_event_handler(&DROP_HANDLER, document, "drop", |event| {
        let files = dropped_files(&event);
        dispatch_event(InputEvent::Drop { files }, &event);
    });
    install_event_handler(&PASTE_HANDLER, document, "paste", |event| {
        let items = clipboard_items(&event);
        let focus = current_focus();
        dispatch_event(InputEvent::Paste { items, focus }, &event);
    });
    install_event_handler(&POPSTATE_HANDLER, window, "popstate", |event| {
        dispatch_event(InputEvent::HistoryPop, &event);
    });
    install_event_handler(
        &INSTALL_PROMPT_HANDLER,
        window,
        BEFORE_INSTALL_PROMPT_EVENT,
        capture_install_offer,
    );
    install_event_handler(&KEYDOWN_HANDLER, document, "keydown", |event| {
        let press = key_press(&event);
        dispatch_event(InputEvent::KeyDown(press), &event);
    });
}

type HandlerSlot<E> = std::thread::LocalKey<RefCell<Option<Closure<dyn FnMut(E)>>>>;

fn install_event_handler<E>(
    slot: &'static HandlerSlot<E>,
    target: &web_sys::EventTarget,
    event_name: &str,
    handler: fn(E),
) where
    E: 'static,
    dyn FnMut(E): WasmClosure,
{
    slot.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(E)>::wrap(Box::new(handler));
        if let Err(error) =
            target.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
        {
            tracing::warn!(
                event = event_name,
                error = %js_error_message(&error),
                "listener registration failed"
            );
            return;
        }
        *slot.borrow_mut() = Some(callback);
    });
}

fn capture_install_offer(event: web_sys::Event) {
    let offer: JsValue = event.clone().into();
    let captured = with_shell(|shell| shell.capture_install_offer(offer)).unwrap_or(false);
    if captured {
        event.prevent_default();
        notify_state_changed();
    }
}

fn dropped_files(event: &web_sys::Event) -> Vec<DroppedFile> {
    let Some(files) = event
        .dyn_ref::<web_sys::DragEvent>()
        .and_then(web_sys::DragEvent::data_transfer)
        .and_then(|transfer| transfer.files())
    else {
        return Vec::new();
    };
    (0..files.length())
        .filter_map(|index| files.get(index))
        .map(|file| DroppedFile {
            mime_type: file.type_(),
            name: file.name(),
        })
        .collect()
}

fn clipboard_items(event: &web_sys::Event) -> Vec<ClipboardItem> {
    let Some(items) = event
        .dyn_ref::<web_sys::ClipboardEvent>()
        .and_then(web_sys::ClipboardEvent::clipboard_data)
        .map(|transfer| transfer.items())
    else {
        return Vec::new();
    };
    (0..items.length())
        .filter_map(|index| items.get(index))
        .map(|item| ClipboardItem {
            mime_type: item.type_(),
        })
        .collect()
}

fn key_press(event: &web_sys::KeyboardEvent) -> KeyPress {
    KeyPress {
        key: event.key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
        repeat: event.repeat(),
        focus: current_focus(),
    }
}

fn current_focus() -> FocusContext {
    let editable = web_sys::window()
        .and_then(|window| window.document())
        .is_some_and(|document| active_element_accepts_text(&document));
    if editable {
        FocusContext::EditableControl
    } else {
        FocusContext::Page
    }
}
