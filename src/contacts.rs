/// Recent-chats and blacklist collection logic for ChainChat
///
/// These are the pure value types persisted through chrome.storage; all
/// mutation rules (ordering, cap, dedup) live here so they can be tested
/// without a browser.
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the recent-chats list
pub const MAX_RECENT_CHATS: usize = 10;

/// A domain owner the user has started (or been offered) a chat with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentContact {
    pub domain: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    pub added_at_epoch_millis: i64,
}

/// Ordered recent-chats list, most recent first, capped at
/// `MAX_RECENT_CHATS` entries
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RecentChats(Vec<RecentContact>);

impl RecentChats {
    pub fn new() -> Self {
        RecentChats(Vec::new())
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.iter().any(|c| c.domain == domain)
    }

    /// Insert a contact at the front. A prior entry for the same domain is
    /// removed first, so recency always reflects the latest add and the
    /// list never holds duplicates.
    pub fn upsert(&mut self, contact: RecentContact) {
        self.0.retain(|c| c.domain != contact.domain);
        self.0.insert(0, contact);
        self.0.truncate(MAX_RECENT_CHATS);
    }

    pub fn remove(&mut self, domain: &str) -> bool {
        let original_len = self.0.len();
        self.0.retain(|c| c.domain != domain);
        self.0.len() < original_len
    }

    pub fn entries(&self) -> &[RecentContact] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// User-curated set of domains excluded from monitoring. Membership is an
/// exact string match over normalized domains; no wildcarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Blacklist(Vec<String>);

impl Blacklist {
    pub fn new() -> Self {
        Blacklist(Vec::new())
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.iter().any(|d| d == domain)
    }

    /// Add a domain; returns false if it was already present.
    pub fn add(&mut self, domain: String) -> bool {
        if self.contains(&domain) {
            return false;
        }
        self.0.push(domain);
        true
    }

    pub fn remove(&mut self, domain: &str) -> bool {
        let original_len = self.0.len();
        self.0.retain(|d| d != domain);
        self.0.len() < original_len
    }

    pub fn domains(&self) -> &[String] {
        &self.0
    }
}
