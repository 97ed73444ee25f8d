/// chrome.* API bindings for the background worker
///
/// All extern declarations live here; callers get typed async wrappers.
/// Detail objects are built from serde structs so the wire field names
/// (tabId, iconUrl, ...) stay in one place.
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const BADGE_ACTIVE_TEXT: &str = "✓";
const BADGE_ACTIVE_COLOR: &str = "#16a34a";
const NOTIFICATION_ICON: &str = "icons/icon128.png";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeText)]
    fn set_badge_text(details: JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeBackgroundColor)]
    fn set_badge_background_color(details: JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = openPopup)]
    fn open_popup() -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "notifications"], js_name = create)]
    fn create_notification(notification_id: &str, options: JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = query)]
    fn query_tabs(query_info: JsValue) -> js_sys::Promise;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BadgeText<'a> {
    tab_id: i32,
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BadgeColor<'a> {
    tab_id: i32,
    color: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TabQuery {
    active: bool,
    current_window: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationOptions<'a> {
    r#type: &'a str,
    icon_url: &'a str,
    title: &'a str,
    message: &'a str,
}

/// The subset of a chrome tab object the monitor cares about. Tabs
/// without an id (e.g. devtools windows) are skipped by callers.
#[derive(Debug, Deserialize)]
pub struct TabRef {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Mark the tab's action icon: a registered owner was found.
pub async fn show_active_badge(tab_id: i32) -> Result<(), JsValue> {
    let text = serde_wasm_bindgen::to_value(&BadgeText { tab_id, text: BADGE_ACTIVE_TEXT })?;
    JsFuture::from(set_badge_text(text)).await?;

    let color = serde_wasm_bindgen::to_value(&BadgeColor { tab_id, color: BADGE_ACTIVE_COLOR })?;
    JsFuture::from(set_badge_background_color(color)).await?;
    Ok(())
}

/// Remove the badge (the empty string is how setBadgeText spells "none").
pub async fn clear_badge(tab_id: i32) -> Result<(), JsValue> {
    let text = serde_wasm_bindgen::to_value(&BadgeText { tab_id, text: "" })?;
    JsFuture::from(set_badge_text(text)).await?;
    Ok(())
}

/// Ask the browser to open the extension popup. Rejects when there is no
/// active browser window to attach it to.
pub async fn try_open_popup() -> Result<(), JsValue> {
    JsFuture::from(open_popup()).await?;
    Ok(())
}

/// Create (or replace) the system notification keyed to `domain`, so
/// repeat resolutions for one domain never stack up.
pub async fn create_owner_notification(domain: &str) -> Result<(), JsValue> {
    let id = format!("chainchat-{domain}");
    let options = serde_wasm_bindgen::to_value(&NotificationOptions {
        r#type: "basic",
        icon_url: NOTIFICATION_ICON,
        title: "Domain owner found",
        message: &format!("The owner of {domain} accepts chat messages."),
    })?;
    JsFuture::from(create_notification(&id, options)).await?;
    Ok(())
}

/// The active tab of the current window, if any.
pub async fn active_tab() -> Result<Option<TabRef>, JsValue> {
    let query = serde_wasm_bindgen::to_value(&TabQuery { active: true, current_window: true })?;
    let tabs = JsFuture::from(query_tabs(query)).await?;
    let mut tabs: Vec<TabRef> = serde_wasm_bindgen::from_value(tabs).map_err(JsValue::from)?;
    if tabs.is_empty() {
        Ok(None)
    } else {
        Ok(Some(tabs.swap_remove(0)))
    }
}
