//! Discord bridge plugin for chatbridge.
//!
//! Connects to the Discord Gateway API via a persistent WebSocket using
//! the serenity library. Republishes inbound messages as host events,
//! dispatches prefix-qualified commands from a shared registry, and
//! exposes a facade other plugins use to talk to Discord.

pub mod api;
pub mod bridge;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod plugin;
pub mod registry;
pub mod state;

#[cfg(test)]
mod testutil;

pub use {
    api::DiscordApi,
    config::{DEFAULT_COMMAND_PREFIX, DiscordConfig, TOKEN_PLACEHOLDER},
    error::Error,
    plugin::DiscordPlugin,
    registry::{Command, CommandContext, CommandRegistry, FnCommand},
};
