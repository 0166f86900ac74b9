//! Event Notification Infrastructure
//!
//! Async publisher/listener plumbing for [`LedgerEvent`]s. Listeners live
//! behind a shared mutex so publishing from the service layer never races
//! subscription; a failing listener is logged and skipped, never allowed to
//! poison the ledger operation that produced the event.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::events::LedgerEvent;

/// Trait for entities that listen to ledger events
#[async_trait]
pub trait LedgerEventListener: Send {
    /// Called for every published event
    ///
    /// Async so listeners can hand events to channels, sockets, or indexes
    /// without blocking other listeners.
    async fn on_event(&mut self, event: LedgerEvent) -> Result<()>;
}

/// Thread-safe fan-out publisher for ledger events
#[derive(Clone, Default)]
pub struct LedgerEventPublisher {
    listeners: Arc<Mutex<Vec<Box<dyn LedgerEventListener>>>>,
}

impl std::fmt::Debug for LedgerEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerEventPublisher").finish()
    }
}

impl LedgerEventPublisher {
    /// Create a publisher with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a listener to all future events
    pub async fn subscribe(&self, listener: Box<dyn LedgerEventListener>) {
        self.listeners.lock().await.push(listener);
    }

    /// Publish an event to every subscriber
    pub async fn publish(&self, event: LedgerEvent) {
        let mut listeners = self.listeners.lock().await;
        for listener in listeners.iter_mut() {
            if let Err(e) = listener.on_event(event.clone()).await {
                tracing::warn!("ledger event listener error on {}: {}", event, e);
            }
        }
    }

    /// Number of subscribed listeners
    pub async fn listener_count(&self) -> usize {
        self.listeners.lock().await.len()
    }
}

/// Listener that captures events for tests
#[derive(Debug, Clone, Default)]
pub struct CapturingListener {
    events: Arc<Mutex<Vec<LedgerEvent>>>,
}

impl CapturingListener {
    /// Create an empty capturing listener
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured events, in publish order
    pub async fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl LedgerEventListener for CapturingListener {
    async fn on_event(&mut self, event: LedgerEvent) -> Result<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
