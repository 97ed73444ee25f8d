/// Typed accessors over chrome.storage.sync
///
/// Values are stored as plain JSON objects (not stringified) so they stay
/// readable in the browser's storage inspector. Each mutation is a
/// read-modify-write of the whole collection value; chrome serializes
/// storage operations per area, which is enough given the single-worker,
/// mostly-sequential access pattern.
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::contacts::{Blacklist, RecentChats};

const KEY_ENABLED: &str = "extensionEnabled";
const KEY_BLACKLIST: &str = "blacklistedDomains";
const KEY_RECENT_CHATS: &str = "recentChats";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"])]
    fn get(keys: JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"])]
    fn set(items: JsValue) -> js_sys::Promise;
}

async fn read_key(key: &str) -> Result<JsValue, JsValue> {
    let keys = js_sys::Array::new();
    keys.push(&key.into());

    let result = JsFuture::from(get(keys.into())).await?;
    js_sys::Reflect::get(&result, &key.into())
}

async fn write_key(key: &str, value: &JsValue) -> Result<(), JsValue> {
    let items = js_sys::Object::new();
    js_sys::Reflect::set(&items, &key.into(), value)?;
    JsFuture::from(set(items.into())).await?;
    Ok(())
}

/// Monitoring defaults to on until the user toggles it off.
pub async fn load_enabled() -> Result<bool, JsValue> {
    Ok(read_key(KEY_ENABLED).await?.as_bool().unwrap_or(true))
}

pub async fn save_enabled(enabled: bool) -> Result<(), JsValue> {
    write_key(KEY_ENABLED, &JsValue::from_bool(enabled)).await
}

pub async fn load_blacklist() -> Result<Blacklist, JsValue> {
    let value = read_key(KEY_BLACKLIST).await?;
    if value.is_undefined() || value.is_null() {
        return Ok(Blacklist::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

pub async fn save_blacklist(blacklist: &Blacklist) -> Result<(), JsValue> {
    let value = serde_wasm_bindgen::to_value(blacklist)?;
    write_key(KEY_BLACKLIST, &value).await
}

pub async fn load_recent_chats() -> Result<RecentChats, JsValue> {
    let value = read_key(KEY_RECENT_CHATS).await?;
    if value.is_undefined() || value.is_null() {
        return Ok(RecentChats::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

pub async fn save_recent_chats(chats: &RecentChats) -> Result<(), JsValue> {
    let value = serde_wasm_bindgen::to_value(chats)?;
    write_key(KEY_RECENT_CHATS, &value).await
}
