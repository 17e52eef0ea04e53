use super::*;

use wasm_bindgen_futures::{JsFuture, spawn_local};

/// Shows the captured platform install prompt and logs the user's choice.
pub(super) fn invoke_offer(offer: JsValue) {
    let prompt = js_sys::Reflect::get(&offer, &JsValue::from_str("prompt"))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
    let Some(prompt) = prompt else {
        tracing::warn!("install offer has no prompt function");
        return;
    };
    if let Err(error) = prompt.call0(&offer) {
        tracing::warn!(error = %js_error_message(&error), "install prompt failed");
        return;
    }

    let Some(choice) = js_sys::Reflect::get(&offer, &JsValue::from_str("userChoice"))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Promise>().ok())
    else {
        return;
    };
    spawn_local(async move {
        match JsFuture::from(choice).await {
            Ok(choice) => {
                let outcome = js_sys::Reflect::get(&choice, &JsValue::from_str("outcome"))
                    .ok()
                    .and_then(|value| value.as_string())
                    .unwrap_or_default();
                tracing::info!(%outcome, "install prompt resolved");
            }
            Err(error) => {
                tracing::warn!(error = %js_error_message(&error), "install prompt rejected");
            }
        }
    });
}
