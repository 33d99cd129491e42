use std::sync::{Arc, RwLock};

use crate::gateway::Gateway;

/// Identity reported by the gateway on a successful login; used to
/// filter self-authored messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub user_id: u64,
    pub username: String,
}

/// Process-wide handle to the live gateway connection. Set once by the
/// lifecycle task after a successful login, cleared on shutdown or
/// stream closure; everything else only reads it.
pub type SharedGateway = Arc<RwLock<Option<Arc<dyn Gateway>>>>;

/// Bot identity slot, written by the event bridge on `ready`.
pub type SharedIdentity = Arc<RwLock<Option<BotIdentity>>>;

pub fn new_shared_gateway() -> SharedGateway {
    Arc::new(RwLock::new(None))
}

pub fn new_shared_identity() -> SharedIdentity {
    Arc::new(RwLock::new(None))
}

/// Snapshot the current connection handle, if any.
pub fn current_gateway(shared: &SharedGateway) -> Option<Arc<dyn Gateway>> {
    let slot = shared.read().unwrap_or_else(|e| e.into_inner());
    slot.clone()
}

/// Take the connection handle out of the slot, leaving it empty.
pub fn take_gateway(shared: &SharedGateway) -> Option<Arc<dyn Gateway>> {
    let mut slot = shared.write().unwrap_or_else(|e| e.into_inner());
    slot.take()
}

/// Publish a freshly established connection handle.
pub fn publish_gateway(shared: &SharedGateway, gateway: Arc<dyn Gateway>) {
    let mut slot = shared.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(gateway);
}

pub fn current_identity(shared: &SharedIdentity) -> Option<BotIdentity> {
    let slot = shared.read().unwrap_or_else(|e| e.into_inner());
    slot.clone()
}

pub fn set_identity(shared: &SharedIdentity, identity: BotIdentity) {
    let mut slot = shared.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(identity);
}

pub fn clear_identity(shared: &SharedIdentity) {
    let mut slot = shared.write().unwrap_or_else(|e| e.into_inner());
    *slot = None;
}
