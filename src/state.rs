/// Authoritative in-memory state for the background worker
///
/// Exactly one `ExtensionState` exists per worker (see `lib.rs`). UI
/// surfaces never touch it directly; they go through the message router.
/// Every mutation that invalidates in-flight work (domain change, toggle)
/// bumps a generation counter; async continuations capture the generation
/// they started under and bail out when it no longer matches, so a stale
/// resolution or notification timer can never clobber newer state.
use std::cell::RefCell;

use serde::{Deserialize, Serialize};

thread_local! {
    static STATE: RefCell<ExtensionState> = RefCell::new(ExtensionState::new(true));
}

/// Run `f` against the worker's state. The closure must not suspend, so a
/// borrow can never be held across an await point; async flows re-enter
/// here after each suspension and re-validate via the generation counter.
pub fn with_state<R>(f: impl FnOnce(&mut ExtensionState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Owner data returned by a successful name resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOwner {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
}

#[derive(Debug, Default)]
pub struct ExtensionState {
    enabled: bool,
    current_domain: Option<String>,
    resolved_owner: Option<ResolvedOwner>,
    generation: u64,
}

impl ExtensionState {
    pub fn new(enabled: bool) -> Self {
        ExtensionState {
            enabled,
            current_domain: None,
            resolved_owner: None,
            generation: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_domain(&self) -> Option<&str> {
        self.current_domain.as_deref()
    }

    pub fn resolved_owner(&self) -> Option<&ResolvedOwner> {
        self.resolved_owner.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Adopt the persisted flag at worker startup, before any tab event
    /// has been processed.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip the enabled flag. Disabling clears the resolved owner and
    /// invalidates in-flight work immediately. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.resolved_owner = None;
        self.generation += 1;
        self.enabled
    }

    /// Replace the tracked domain, clearing any stale owner and starting a
    /// new generation. Returns the generation tag for the caller's
    /// follow-up resolution.
    pub fn set_domain(&mut self, domain: Option<String>) -> u64 {
        self.current_domain = domain;
        self.resolved_owner = None;
        self.generation += 1;
        self.generation
    }

    /// Commit a resolution result, but only if `generation` still matches:
    /// a result for a domain the user has since navigated away from (or a
    /// toggle-invalidated one) is dropped. Returns whether it was applied.
    pub fn commit_resolution(&mut self, generation: u64, owner: ResolvedOwner) -> bool {
        if generation != self.generation || !self.enabled || self.current_domain.is_none() {
            return false;
        }
        self.resolved_owner = Some(owner);
        true
    }

    /// Record a failed or empty resolution, but only if `generation`
    /// still matches. Returns whether it was applied; callers skip their
    /// badge side effects on a stale miss so a late NotFound can't wipe
    /// the marker a newer resolution just set.
    pub fn commit_miss(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.resolved_owner = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(address: &str) -> ResolvedOwner {
        ResolvedOwner {
            address: address.to_string(),
            price: None,
            price_decimals: None,
            currency_symbol: None,
        }
    }

    #[test]
    fn test_commit_requires_matching_generation() {
        let mut state = ExtensionState::new(true);
        let generation = state.set_domain(Some("a.com".to_string()));

        // Navigation happened while the resolution was in flight
        state.set_domain(Some("b.com".to_string()));

        assert!(!state.commit_resolution(generation, owner("0xaaa")));
        assert!(state.resolved_owner().is_none());
    }

    #[test]
    fn test_commit_applies_when_current() {
        let mut state = ExtensionState::new(true);
        let generation = state.set_domain(Some("a.com".to_string()));

        assert!(state.commit_resolution(generation, owner("0xaaa")));
        assert_eq!(state.resolved_owner().unwrap().address, "0xaaa");
    }

    #[test]
    fn test_domain_change_clears_owner() {
        let mut state = ExtensionState::new(true);
        let generation = state.set_domain(Some("a.com".to_string()));
        state.commit_resolution(generation, owner("0xaaa"));

        state.set_domain(Some("b.com".to_string()));
        assert!(state.resolved_owner().is_none());
    }

    #[test]
    fn test_toggle_clears_owner_and_invalidates() {
        let mut state = ExtensionState::new(true);
        let generation = state.set_domain(Some("a.com".to_string()));
        state.commit_resolution(generation, owner("0xaaa"));

        assert!(!state.toggle());
        assert!(state.resolved_owner().is_none());

        // A resolution issued before the toggle must not land after it
        assert!(!state.commit_resolution(generation, owner("0xaaa")));
    }

    #[test]
    fn test_commit_rejected_while_disabled() {
        let mut state = ExtensionState::new(false);
        let generation = state.set_domain(Some("a.com".to_string()));

        assert!(!state.commit_resolution(generation, owner("0xaaa")));
    }

    #[test]
    fn test_stale_miss_keeps_newer_resolution() {
        let mut state = ExtensionState::new(true);
        let stale = state.set_domain(Some("a.com".to_string()));

        // Navigation to b.com resolves while the a.com lookup is in flight
        let current = state.set_domain(Some("b.com".to_string()));
        assert!(state.commit_resolution(current, owner("0xbbb")));

        // The a.com lookup comes back empty afterwards: dropped, and the
        // caller is told not to touch the badge either
        assert!(!state.commit_miss(stale));
        assert_eq!(state.resolved_owner().unwrap().address, "0xbbb");
    }

    #[test]
    fn test_current_miss_clears_resolution() {
        let mut state = ExtensionState::new(true);
        let generation = state.set_domain(Some("a.com".to_string()));

        assert!(state.commit_miss(generation));
        assert!(state.resolved_owner().is_none());
    }

    #[test]
    fn test_commit_rejected_without_domain() {
        let mut state = ExtensionState::new(true);
        let generation = state.set_domain(None);

        assert!(!state.commit_resolution(generation, owner("0xaaa")));
    }
}
