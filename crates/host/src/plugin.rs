use async_trait::async_trait;

use crate::error::Result;

/// Lifecycle contract for host plugins.
///
/// `start` must not block: long-running work belongs in a spawned task
/// so the host's main loop stays responsive. A failed start is reported
/// through the returned error; the host keeps running either way.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable machine identifier.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    async fn start(&mut self) -> Result<()>;

    /// Release resources and stop background work. Must be idempotent.
    async fn shutdown(&mut self);
}
