//! Application-level hard-reset signal.
//!
//! SYSTEM CONTEXT
//! ==============
//! An authorization failure anywhere must leave no stale authenticated
//! view reachable. Instead of reloading the process, the gateway fires a
//! `HardReset` event that every stateful view subscribes to, and bumps a
//! reset generation. Work started before a reset can compare generations
//! (`ViewScope::is_stale`) and drop its late result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Why a hard reset happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// Backend answered 401.
    Unauthenticated,
    /// Backend answered 403.
    Forbidden,
}

impl ResetReason {
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Unauthenticated),
            403 => Some(Self::Forbidden),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Discard all in-memory UI state and go to `to`.
    HardReset { to: String, reason: ResetReason },
}

#[derive(Clone)]
pub struct Navigator {
    tx: broadcast::Sender<NavigationEvent>,
    generation: Arc<AtomicU64>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx, generation: Arc::new(AtomicU64::new(0)) }
    }

    /// Number of hard resets fired so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.tx.subscribe()
    }

    /// Capture the current generation for a view that is about to start work.
    #[must_use]
    pub fn scope(&self) -> ViewScope {
        ViewScope { generation: self.generation(), navigator: self.clone() }
    }

    /// Bump the generation, then broadcast. Having no subscribers is fine.
    pub fn hard_reset(&self, to: &str, reason: ResetReason) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::warn!(%to, ?reason, generation, "hard reset");
        let _ = self.tx.send(NavigationEvent::HardReset { to: to.to_owned(), reason });
    }
}

/// Generation snapshot held by a mounted view.
#[derive(Clone)]
pub struct ViewScope {
    generation: u64,
    navigator: Navigator,
}

impl ViewScope {
    /// True once any hard reset fired after this scope was taken.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.navigator.generation() != self.generation
    }
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;
