/// Tab monitor: turns navigation and activation events into resolutions
///
/// Per tracked domain the flow is Idle → Resolving → Found/NotFound.
/// Re-seeing the tracked domain is a no-op; every domain change starts a
/// new generation, and any continuation from an older generation (a late
/// resolution, a pending notification timer) drops itself on re-entry.
/// Resolver failures are logged and swallowed; a dead lookup must never
/// block future navigations.
use gloo_timers::future::TimeoutFuture;

use crate::contacts::{Blacklist, RecentChats};
use crate::{browser, domain, notify, resolver, state, store};

const NOTIFY_DELAY_MS: u32 = 500;

/// Entry point for "tab finished loading" and "tab activated" events.
pub async fn on_tab_event(tab_id: i32, url: Option<String>) {
    process_tab(tab_id, url, false).await;
}

/// Re-run the pipeline for the active tab, bypassing the domain-equality
/// short-circuit. Used when monitoring is re-enabled.
pub async fn refresh_active_tab() {
    match browser::active_tab().await {
        Ok(Some(tab)) => {
            if let Some(id) = tab.id {
                process_tab(id, tab.url, true).await;
            }
        }
        Ok(None) => {}
        Err(e) => log::warn!("active tab query failed: {e:?}"),
    }
}

/// Clear the active tab's badge; used when monitoring is disabled.
pub async fn clear_active_tab_badge() {
    if let Ok(Some(tab)) = browser::active_tab().await {
        if let Some(id) = tab.id {
            clear_badge(id).await;
        }
    }
}

/// Tab-update events fire several times per navigation; an unchanged
/// domain means the pipeline already ran (or is running) for it.
fn needs_update(current: Option<&str>, next: Option<&str>, force: bool) -> bool {
    force || current != next
}

/// Pre-resolution gating. `None` means skip resolution entirely
/// (blacklisted); `Some(should_notify)` fixes the notification decision
/// before the lookup starts, from the persisted snapshot.
fn resolution_plan(domain: &str, blacklist: &Blacklist, recent: &RecentChats) -> Option<bool> {
    if blacklist.contains(domain) {
        return None;
    }
    Some(!recent.contains(domain))
}

async fn process_tab(tab_id: i32, url: Option<String>, force: bool) {
    let extracted = url.as_deref().and_then(domain::extract_domain);

    if !state::with_state(|s| needs_update(s.current_domain(), extracted.as_deref(), force)) {
        return;
    }

    let generation = state::with_state(|s| s.set_domain(extracted.clone()));

    if !state::with_state(|s| s.enabled()) {
        clear_badge(tab_id).await;
        return;
    }

    let Some(tracked) = extracted else {
        clear_badge(tab_id).await;
        return;
    };

    // Snapshot the persisted lists before resolving; shouldNotify is fixed
    // at this point even though the resolution may take a while.
    let blacklist = store::load_blacklist().await.unwrap_or_else(|e| {
        log::warn!("blacklist read failed: {e:?}");
        Blacklist::new()
    });
    let recent = store::load_recent_chats().await.unwrap_or_else(|e| {
        log::warn!("recent chats read failed: {e:?}");
        RecentChats::new()
    });

    let Some(should_notify) = resolution_plan(&tracked, &blacklist, &recent) else {
        log::debug!("{tracked} is blacklisted, skipping resolution");
        clear_badge(tab_id).await;
        return;
    };

    match resolver::resolve(&tracked).await {
        Some(owner) => {
            if !state::with_state(|s| s.commit_resolution(generation, owner)) {
                log::debug!("dropping stale resolution for {tracked}");
                return;
            }

            if let Err(e) = browser::show_active_badge(tab_id).await {
                log::warn!("badge update failed on tab {tab_id}: {e:?}");
            }

            if should_notify {
                // Let the tab UI settle before interrupting the user
                TimeoutFuture::new(NOTIFY_DELAY_MS).await;
                if state::with_state(|s| s.generation() == generation) {
                    notify::owner_found(&tracked).await;
                }
            }
        }
        None => {
            if !state::with_state(|s| s.commit_miss(generation)) {
                log::debug!("dropping stale lookup miss for {tracked}");
                return;
            }
            clear_badge(tab_id).await;
        }
    }
}

async fn clear_badge(tab_id: i32) {
    if let Err(e) = browser::clear_badge(tab_id).await {
        log::debug!("could not clear badge on tab {tab_id}: {e:?}");
    }
}
