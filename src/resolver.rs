/// Name-registry lookup for ChainChat
///
/// One GraphQL POST per call; no caching or retries here (the tab monitor
/// already skips repeat lookups for an unchanged domain). Every failure
/// mode (network error, non-2xx status, GraphQL `errors`, unregistered
/// domain, malformed payload) collapses to `None`, which callers treat
/// the same as "no data yet".
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::state::ResolvedOwner;

const REGISTRY_ENDPOINT: &str = "https://registry.chainchat.app/graphql";

const OWNER_QUERY: &str = "\
query DomainOwner($name: String!) {
  name(name: $name) {
    claimedBy
    tokens {
      listings {
        price
        currency { symbol decimals }
      }
    }
  }
}";

// Global fetch: present in both window and service-worker scopes
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = fetch)]
    fn fetch_with_request(input: &Request) -> js_sys::Promise;
}

#[derive(Debug, Deserialize)]
struct RegistryReply {
    #[serde(default)]
    data: Option<RegistryData>,
    #[serde(default)]
    errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RegistryData {
    #[serde(default)]
    name: Option<NameRecord>,
}

#[derive(Debug, Deserialize)]
struct NameRecord {
    #[serde(rename = "claimedBy", default)]
    claimed_by: Option<String>,
    #[serde(default)]
    tokens: Vec<Token>,
}

#[derive(Debug, Deserialize)]
struct Token {
    #[serde(default)]
    listings: Vec<Listing>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    currency: Option<Currency>,
}

#[derive(Debug, Deserialize)]
struct Currency {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    decimals: Option<u32>,
}

/// Look up the registered owner of `domain`. `None` means "not found",
/// which is never an error from the caller's point of view.
pub async fn resolve(domain: &str) -> Option<ResolvedOwner> {
    match fetch_owner(domain).await {
        Ok(owner) => owner,
        Err(e) => {
            log::warn!("name lookup failed for {domain}: {e:?}");
            None
        }
    }
}

async fn fetch_owner(domain: &str) -> Result<Option<ResolvedOwner>, JsValue> {
    let body = serde_json::json!({
        "query": OWNER_QUERY,
        "variables": { "name": domain },
    })
    .to_string();

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(REGISTRY_ENDPOINT, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let reply = JsFuture::from(fetch_with_request(&request)).await?;
    let response: Response = reply.dyn_into()?;
    if !response.ok() {
        log::warn!("registry returned HTTP {} for {domain}", response.status());
        return Ok(None);
    }

    let text = JsFuture::from(response.text()?).await?;
    Ok(text.as_string().as_deref().and_then(parse_owner))
}

/// Parse a registry reply body into a `ResolvedOwner`. Pure; malformed
/// payloads and application-level errors map to `None` here so nothing
/// downstream ever sees a half-validated shape.
fn parse_owner(body: &str) -> Option<ResolvedOwner> {
    let reply: RegistryReply = serde_json::from_str(body).ok()?;
    if reply.errors.as_ref().is_some_and(|e| !e.is_empty()) {
        return None;
    }

    let record = reply.data?.name?;
    let address = extract_address(record.claimed_by.as_deref()?)?;

    // Only the first token's first listing is considered
    let listing = record.tokens.first().and_then(|t| t.listings.first());
    let currency = listing.and_then(|l| l.currency.as_ref());

    Some(ResolvedOwner {
        address,
        price: listing.and_then(|l| l.price.clone()),
        price_decimals: currency.and_then(|c| c.decimals),
        currency_symbol: currency.and_then(|c| c.symbol.clone()),
    })
}

/// Extract the trailing address from a chain-namespaced identifier
/// (`namespace:chainId:address`, e.g. `eip155:1:0xabc`). Fewer than three
/// segments, or an empty trailing segment, yields `None`.
fn extract_address(claimed_by: &str) -> Option<String> {
    let parts: Vec<&str> = claimed_by.split(':').collect();
    if parts.len() < 3 {
        return None;
    }
    let address = parts[parts.len() - 1];
    if address.is_empty() {
        return None;
    }
    Some(address.to_string())
}
