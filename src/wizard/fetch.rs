//! Fetch slots with stale-response protection.
//!
//! Each dependent fetch owns one slot. A slot remembers the dependency key
//! its current contents belong to and a generation counter bumped on every
//! new request; a response carrying an older generation is discarded, so a
//! request superseded by a dependency change can never overwrite newer
//! state.

use crate::model::FetchState;

#[derive(Debug)]
pub struct FetchSlot<T> {
    state: FetchState<T>,
    generation: u64,
    key: Option<String>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Idle,
            generation: 0,
            key: None,
        }
    }
}

impl<T> FetchSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Start a fetch for `key`, unless the slot is already loading or ready
    /// for that same key. A failed slot may retry the same key (user-driven
    /// retry by re-entering the step). Returns the generation token to hand
    /// to the spawned request, or `None` when no fetch is needed.
    pub fn begin(&mut self, key: &str) -> Option<u64> {
        let current = self.key.as_deref() == Some(key);
        if current && !matches!(self.state, FetchState::Failed(_)) {
            return None;
        }
        self.generation += 1;
        self.key = Some(key.to_string());
        self.state = FetchState::Loading;
        Some(self.generation)
    }

    /// Apply a finished fetch. Returns `false` (and changes nothing) when
    /// the generation is stale.
    pub fn resolve(&mut self, generation: u64, result: Result<Vec<T>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = match result {
            Ok(items) => FetchState::Ready(items),
            Err(message) => FetchState::Failed(message),
        };
        true
    }

    /// Dependencies became unset: drop contents and invalidate any request
    /// still in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.key = None;
        self.state = FetchState::Idle;
    }
}

#[cfg(test)]
impl<T> FetchSlot<T> {
    pub(crate) fn key_for_tests(&self) -> Option<String> {
        self.key.clone()
    }

    pub(crate) fn generation_for_tests(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_fires_once_per_distinct_key() {
        let mut slot = FetchSlot::<String>::new();
        let gen1 = slot.begin("cw1|2025-06-01").expect("first fetch fires");
        assert!(slot.begin("cw1|2025-06-01").is_none(), "same key, no refetch");
        assert!(slot.resolve(gen1, Ok(vec!["08:00".into()])));
        assert!(
            slot.begin("cw1|2025-06-01").is_none(),
            "ready for this key, no refetch"
        );
        assert!(slot.begin("cw1|2025-06-02").is_some(), "new key refetches");
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut slot = FetchSlot::<String>::new();
        let gen1 = slot.begin("SUV").expect("fires");
        let gen2 = slot.begin("Moto").expect("dependency change fires again");

        assert!(!slot.resolve(gen1, Ok(vec!["stale".into()])));
        assert!(slot.state().is_loading(), "stale response must not land");

        assert!(slot.resolve(gen2, Ok(vec!["fresh".into()])));
        assert_eq!(slot.state().items(), Some(&["fresh".to_string()][..]));
    }

    #[test]
    fn failure_lands_and_allows_retry_of_same_key() {
        let mut slot = FetchSlot::<String>::new();
        let gen1 = slot.begin("SUV").expect("fires");
        assert!(slot.resolve(gen1, Err("connection refused".into())));
        assert_eq!(slot.state().error(), Some("connection refused"));

        let gen2 = slot.begin("SUV").expect("failed slot retries same key");
        assert!(slot.resolve(gen2, Ok(vec![])));
        assert_eq!(slot.state().items(), Some(&[][..]));
    }

    #[test]
    fn empty_ready_is_distinct_from_loading_and_failed() {
        let mut slot = FetchSlot::<String>::new();
        let generation = slot.begin("cw1|2025-06-01").expect("fires");
        assert!(slot.state().is_loading());
        assert!(slot.resolve(generation, Ok(vec![])));
        assert!(!slot.state().is_loading());
        assert!(slot.state().error().is_none());
        assert_eq!(slot.state().items(), Some(&[][..]));
    }

    #[test]
    fn reset_invalidates_in_flight_request() {
        let mut slot = FetchSlot::<String>::new();
        let generation = slot.begin("SUV").expect("fires");
        slot.reset();
        assert!(!slot.resolve(generation, Ok(vec!["late".into()])));
        assert_eq!(*slot.state(), FetchState::Idle);
    }
}
