use std::sync::{Arc, RwLock};

use {async_trait::async_trait, tracing::debug};

/// Sentinel used when a message author has no usable display name.
pub const UNKNOWN_USER: &str = "Unknown User";

/// A chat message as seen by host plugins.
///
/// Plain data only; no gateway-library types cross this boundary, and
/// every remote entity is referenced by its opaque id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub message_id: String,
    pub channel_id: String,
    pub author_id: String,
    /// Account name of the author.
    pub author_name: String,
    /// Global display name, when the author has one set.
    pub author_display_name: Option<String>,
    pub content: String,
}

impl MessageEvent {
    /// Name to show in logs: display name, then account name, then the
    /// [`UNKNOWN_USER`] sentinel.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.author_display_name.as_deref()
            && !name.is_empty()
        {
            return name;
        }
        if self.author_name.is_empty() {
            UNKNOWN_USER
        } else {
            &self.author_name
        }
    }
}

/// Host-wide notifications republished by the Discord bridge so other
/// plugins can observe chat traffic without a gateway dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Emitted for every non-self, non-empty inbound message, before
    /// any prefix matching.
    DiscordMessage { event: MessageEvent },
    /// Emitted after every dispatched command attempt, success or
    /// failure.
    DiscordCommand {
        name: String,
        args: Vec<String>,
        event: MessageEvent,
    },
}

impl HostEvent {
    /// Stable event name used for subscription and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DiscordMessage { .. } => "onDiscordMessage",
            Self::DiscordCommand { .. } => "onDiscordCommand",
        }
    }
}

/// Where the bridge publishes its notifications.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: HostEvent);
}

/// A plugin-side consumer of host events.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn handle(&self, event: &HostEvent);
}

/// Fan-out sink delivering each event to every registered listener, in
/// registration order, awaited one after another.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Listeners registered after an `emit` has
    /// started do not see that event.
    pub fn subscribe(&self, listener: Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        listeners.len()
    }
}

#[async_trait]
impl EventSink for EventBus {
    async fn emit(&self, event: HostEvent) {
        // Snapshot under the lock, deliver outside it.
        let listeners: Vec<Arc<dyn EventListener>> = {
            let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
            listeners.clone()
        };
        debug!(
            event = event.name(),
            listeners = listeners.len(),
            "host event emitted"
        );
        for listener in listeners {
            listener.handle(&event).await;
        }
    }
}
