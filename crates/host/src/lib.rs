//! Host-side plugin boundary for chatbridge.
//!
//! Defines the contracts other plugins program against: the cross-plugin
//! event bus, the plugin lifecycle, the shared error type, and the
//! translation table used for user-facing text. Nothing in this crate
//! depends on a chat gateway library.

pub mod error;
pub mod events;
pub mod plugin;
pub mod translate;

pub use {
    error::{Error, Result},
    events::{EventBus, EventListener, EventSink, HostEvent, MessageEvent},
    plugin::Plugin,
    translate::Translations,
};
