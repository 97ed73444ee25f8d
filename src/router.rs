/// Request/response protocol between the UI surfaces and the background
///
/// Requests arrive as `{ action: "...", ... }` objects over
/// chrome.runtime messaging; responses are plain objects. Expected
/// conditions (disabled, nothing resolved, unknown domain) are ordinary
/// response fields; only storage failures reject the message channel.
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::contacts::RecentContact;
use crate::{domain, monitor, state, store};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "getStatus")]
    GetStatus,
    #[serde(rename = "toggleExtension")]
    ToggleExtension,
    #[serde(rename = "getRecentChats")]
    GetRecentChats,
    #[serde(rename = "addToRecentChats")]
    AddToRecentChats {
        domain: String,
        address: String,
        #[serde(default)]
        price: Option<String>,
        #[serde(default)]
        decimals: Option<u32>,
        #[serde(default)]
        currency: Option<String>,
    },
    #[serde(rename = "removeFromRecentChats")]
    RemoveFromRecentChats { domain: String },
    #[serde(rename = "getBlacklist")]
    GetBlacklist,
    #[serde(rename = "addToBlacklist")]
    AddToBlacklist { domain: String },
    #[serde(rename = "removeFromBlacklist")]
    RemoveFromBlacklist { domain: String },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    Status {
        enabled: bool,
        domain: Option<String>,
        address: Option<String>,
        price: Option<String>,
        price_decimals: Option<u32>,
        currency_symbol: Option<String>,
    },
    Toggled { enabled: bool },
    #[serde(rename_all = "camelCase")]
    RecentChats { recent_chats: Vec<RecentContact> },
    #[serde(rename_all = "camelCase")]
    Blacklist { blacklisted_domains: Vec<String> },
    Ack { success: bool },
}

pub async fn handle_request(request: Request) -> Result<Response, JsValue> {
    match request {
        Request::GetStatus => Ok(status_response()),
        Request::ToggleExtension => toggle().await,
        Request::GetRecentChats => {
            let chats = store::load_recent_chats().await?;
            Ok(Response::RecentChats { recent_chats: chats.entries().to_vec() })
        }
        Request::AddToRecentChats { domain, address, price, decimals, currency } => {
            let mut chats = store::load_recent_chats().await?;
            chats.upsert(RecentContact {
                domain,
                address,
                price,
                price_decimals: decimals,
                currency_symbol: currency,
                added_at_epoch_millis: js_sys::Date::now() as i64,
            });
            store::save_recent_chats(&chats).await?;
            Ok(Response::Ack { success: true })
        }
        Request::RemoveFromRecentChats { domain } => {
            let mut chats = store::load_recent_chats().await?;
            let success = chats.remove(&domain);
            if success {
                store::save_recent_chats(&chats).await?;
            }
            Ok(Response::Ack { success })
        }
        Request::GetBlacklist => {
            let blacklist = store::load_blacklist().await?;
            Ok(Response::Blacklist { blacklisted_domains: blacklist.domains().to_vec() })
        }
        Request::AddToBlacklist { domain } => {
            // Normalize so membership lines up with monitor-extracted
            // domains; garbage input is refused, not stored.
            let Some(normalized) = domain::normalize_domain(&domain) else {
                return Ok(Response::Ack { success: false });
            };
            let mut blacklist = store::load_blacklist().await?;
            let success = blacklist.add(normalized);
            if success {
                store::save_blacklist(&blacklist).await?;
            }
            Ok(Response::Ack { success })
        }
        Request::RemoveFromBlacklist { domain } => {
            let mut blacklist = store::load_blacklist().await?;
            let success = blacklist.remove(&domain);
            if success {
                store::save_blacklist(&blacklist).await?;
            }
            Ok(Response::Ack { success })
        }
    }
}

fn status_response() -> Response {
    state::with_state(|s| {
        let owner = s.resolved_owner();
        Response::Status {
            enabled: s.enabled(),
            domain: s.current_domain().map(str::to_string),
            address: owner.map(|o| o.address.clone()),
            price: owner.and_then(|o| o.price.clone()),
            price_decimals: owner.and_then(|o| o.price_decimals),
            currency_symbol: owner.and_then(|o| o.currency_symbol.clone()),
        }
    })
}

async fn toggle() -> Result<Response, JsValue> {
    let enabled = state::with_state(|s| s.toggle());
    store::save_enabled(enabled).await?;

    if enabled {
        monitor::refresh_active_tab().await;
    } else {
        monitor::clear_active_tab_badge().await;
    }

    Ok(Response::Toggled { enabled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{with_state, ResolvedOwner};

    fn parse(json: &str) -> Request {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_parsing() {
        assert_eq!(parse(r#"{"action":"getStatus"}"#), Request::GetStatus);
        assert_eq!(parse(r#"{"action":"toggleExtension"}"#), Request::ToggleExtension);
        assert_eq!(
            parse(r#"{"action":"removeFromBlacklist","domain":"a.com"}"#),
            Request::RemoveFromBlacklist { domain: "a.com".to_string() }
        );
    }

    #[test]
    fn test_add_to_recent_chats_optional_fields() {
        let request = parse(
            r#"{"action":"addToRecentChats","domain":"a.com","address":"0xabc",
                "price":"100","decimals":18,"currency":"ETH"}"#,
        );
        assert_eq!(
            request,
            Request::AddToRecentChats {
                domain: "a.com".to_string(),
                address: "0xabc".to_string(),
                price: Some("100".to_string()),
                decimals: Some(18),
                currency: Some("ETH".to_string()),
            }
        );

        // Price fields are optional on the wire
        let bare = parse(r#"{"action":"addToRecentChats","domain":"a.com","address":"0xabc"}"#);
        assert_eq!(
            bare,
            Request::AddToRecentChats {
                domain: "a.com".to_string(),
                address: "0xabc".to_string(),
                price: None,
                decimals: None,
                currency: None,
            }
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"action":"selfDestruct"}"#).is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let response = Response::Status {
            enabled: true,
            domain: Some("example.com".to_string()),
            address: Some("0xabc".to_string()),
            price: Some("100".to_string()),
            price_decimals: Some(18),
            currency_symbol: Some("ETH".to_string()),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["enabled"], true);
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["priceDecimals"], 18);
        assert_eq!(json["currencySymbol"], "ETH");
    }

    #[test]
    fn test_blacklist_wire_format() {
        let response = Response::Blacklist {
            blacklisted_domains: vec!["a.com".to_string()],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["blacklistedDomains"][0], "a.com");
    }

    #[test]
    fn test_status_while_disabled_keeps_domain() {
        with_state(|s| {
            let generation = s.set_domain(Some("example.com".to_string()));
            assert!(s.commit_resolution(
                generation,
                ResolvedOwner {
                    address: "0xabc".to_string(),
                    price: None,
                    price_decimals: None,
                    currency_symbol: None,
                },
            ));
            assert!(!s.toggle());
        });

        match status_response() {
            Response::Status { enabled, domain, address, .. } => {
                assert!(!enabled);
                // The tracked domain survives a disable; the owner does not
                assert_eq!(domain.as_deref(), Some("example.com"));
                assert_eq!(address, None);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_status_reflects_resolution() {
        with_state(|s| {
            let generation = s.set_domain(Some("example.com".to_string()));
            s.commit_resolution(
                generation,
                ResolvedOwner {
                    address: "0xabc".to_string(),
                    price: Some("100".to_string()),
                    price_decimals: Some(18),
                    currency_symbol: Some("ETH".to_string()),
                },
            );
        });

        match status_response() {
            Response::Status { address, price, price_decimals, currency_symbol, .. } => {
                assert_eq!(address.as_deref(), Some("0xabc"));
                assert_eq!(price.as_deref(), Some("100"));
                assert_eq!(price_decimals, Some(18));
                assert_eq!(currency_symbol.as_deref(), Some("ETH"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
