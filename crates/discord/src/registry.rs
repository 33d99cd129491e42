use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

use {
    async_trait::async_trait,
    tracing::{info, warn},
};

use chatbridge_host::MessageEvent;

use crate::state::SharedGateway;

/// Per-invocation context handed to command handlers: the triggering
/// message, the active prefix, and the connection handle. Lives for one
/// dispatch call.
#[derive(Clone)]
pub struct CommandContext {
    pub message: MessageEvent,
    pub prefix: String,
    pub gateway: SharedGateway,
}

/// A named, described unit of behavior invoked with parsed arguments.
///
/// `execute` returns true when the invocation succeeded; the dispatcher
/// turns that flag into user-visible feedback.
#[async_trait]
pub trait Command: Send + Sync {
    /// Unique, case-sensitive, non-empty name.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn execute(&self, ctx: &CommandContext, args: &[String]) -> bool;
}

type CommandFuture = Pin<Box<dyn Future<Output = bool> + Send>>;

/// Closure-backed [`Command`], the registration path other plugins use.
pub struct FnCommand {
    name: String,
    description: String,
    handler: Box<dyn Fn(CommandContext, Vec<String>) -> CommandFuture + Send + Sync>,
}

impl FnCommand {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(CommandContext, Vec<String>) -> CommandFuture + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Command for FnCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, ctx: &CommandContext, args: &[String]) -> bool {
        (self.handler)(ctx.clone(), args.to_vec()).await
    }
}

/// In-memory store of commands keyed by name.
///
/// Registration happens during plugin startup; dispatch only reads, so
/// the interior lock sees concurrent readers but no read/write races in
/// practice.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<dyn Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command. A name collision is logged and dropped; the
    /// first registration wins, and a bad registration must not abort
    /// plugin startup.
    pub fn register(&self, command: Arc<dyn Command>) {
        let name = command.name().to_string();
        if name.is_empty() {
            warn!("rejected discord command registration with empty name");
            return;
        }
        let mut commands = self.commands.write().unwrap_or_else(|e| e.into_inner());
        if commands.contains_key(&name) {
            warn!(command = %name, "discord command already exists; registration ignored");
            return;
        }
        info!(command = %name, "registered discord command");
        commands.insert(name, command);
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        let commands = self.commands.read().unwrap_or_else(|e| e.into_inner());
        commands.get(name).cloned()
    }

    /// Point-in-time view for enumeration. Later registrations do not
    /// appear in a snapshot already handed out.
    pub fn snapshot(&self) -> Vec<Arc<dyn Command>> {
        let commands = self.commands.read().unwrap_or_else(|e| e.into_inner());
        commands.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let commands = self.commands.read().unwrap_or_else(|e| e.into_inner());
        commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
