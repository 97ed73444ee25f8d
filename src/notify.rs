/// Notification policy: how the user is told an owner was found
///
/// Best-effort and fire-and-forget. Opening the popup is preferred; a
/// per-domain system notification is the fallback. Nothing here ever
/// propagates an error to the monitor.
use crate::browser;

pub async fn owner_found(domain: &str) {
    if browser::try_open_popup().await.is_ok() {
        return;
    }

    log::info!("popup could not be opened, falling back to a notification for {domain}");
    if let Err(e) = browser::create_owner_notification(domain).await {
        log::warn!("notification for {domain} failed: {e:?}");
    }
}
