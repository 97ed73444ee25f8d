/// ChainChat - Chrome extension that detects blockchain-registered domain
/// owners and lets the user start a chat with them
/// Built with Rust + WASM
///
/// The exported functions below are the whole background service worker:
/// a thin JS glue file registers chrome.tabs.onUpdated (status
/// "complete"), chrome.tabs.onActivated, and chrome.runtime.onMessage,
/// and forwards each event here.

mod browser;
mod contacts;
mod domain;
mod monitor;
mod notify;
mod resolver;
mod router;
mod state;
mod store;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Re-initialize in-memory state from the persisted store. Called once by
/// the glue when the service worker starts.
#[wasm_bindgen]
pub async fn init_background() {
    match store::load_enabled().await {
        Ok(enabled) => state::with_state(|s| s.set_enabled(enabled)),
        Err(e) => log::warn!("could not load persisted settings: {e:?}"),
    }
    log::info!("chainchat background initialized");
}

/// A tab finished loading.
#[wasm_bindgen]
pub async fn on_tab_updated(tab_id: i32, url: Option<String>) {
    monitor::on_tab_event(tab_id, url).await;
}

/// A tab became the active tab.
#[wasm_bindgen]
pub async fn on_tab_activated(tab_id: i32, url: Option<String>) {
    monitor::on_tab_event(tab_id, url).await;
}

/// Handle one request from a UI surface. The channel rejects only on
/// storage failure or an unrecognized request shape.
#[wasm_bindgen]
pub async fn handle_message(message: JsValue) -> Result<JsValue, JsValue> {
    let request: router::Request =
        serde_wasm_bindgen::from_value(message).map_err(JsValue::from)?;
    let response = router::handle_request(request).await?;
    serde_wasm_bindgen::to_value(&response).map_err(JsValue::from)
}
