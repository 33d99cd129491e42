use std::sync::Arc;

use tracing::{debug, info};

use chatbridge_host::{EventSink, HostEvent, MessageEvent};

use crate::{
    registry::{CommandContext, CommandRegistry},
    state::{SharedGateway, current_gateway},
};

/// Reaction attached to the triggering message on a successful
/// execution.
pub const SUCCESS_REACTION: &str = "\u{2705}";
/// Reaction attached when the handler reports failure.
pub const FAILURE_REACTION: &str = "\u{274C}";

/// A prefix-stripped command invocation; discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub name: String,
    pub args: Vec<String>,
}

/// Split `content` into a command name and argument tokens.
///
/// Returns `None` when `content` does not start with `prefix` (exact,
/// case-sensitive) or when nothing follows it. Argument tokens keep
/// their original order and content.
pub fn parse_invocation(prefix: &str, content: &str) -> Option<ParsedInvocation> {
    let rest = content.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?.to_string();
    let args = tokens.map(str::to_string).collect();
    Some(ParsedInvocation { name, args })
}

/// What a dispatch call did, for callers that care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub invocation: ParsedInvocation,
    pub success: bool,
}

/// Turns one inbound chat message into at most one command execution
/// plus observable feedback (result reaction, cross-plugin event, log
/// line).
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    sink: Arc<dyn EventSink>,
    gateway: SharedGateway,
    prefix: String,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        sink: Arc<dyn EventSink>,
        gateway: SharedGateway,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            sink,
            gateway,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Dispatch a message already known to carry the prefix.
    ///
    /// An unrecognized command name is not an error: it produces no
    /// reaction and no notification. A recognized command always
    /// produces exactly one reaction and one `onDiscordCommand`
    /// emission, in that order, whatever its result.
    pub async fn dispatch(&self, event: &MessageEvent) -> Option<DispatchOutcome> {
        if event.content.is_empty() {
            return None;
        }
        let invocation = parse_invocation(&self.prefix, &event.content)?;
        let command = self.registry.get(&invocation.name)?;

        let ctx = CommandContext {
            message: event.clone(),
            prefix: self.prefix.clone(),
            gateway: Arc::clone(&self.gateway),
        };
        let success = command.execute(&ctx, &invocation.args).await;

        self.react(event, success).await;
        self.sink
            .emit(HostEvent::DiscordCommand {
                name: invocation.name.clone(),
                args: invocation.args.clone(),
                event: event.clone(),
            })
            .await;

        info!(
            user = %event.display_name(),
            command = %invocation.name,
            args = ?invocation.args,
            success,
            "discord command executed"
        );

        Some(DispatchOutcome {
            invocation,
            success,
        })
    }

    /// Fire-and-forget result reaction; its own failure is logged and
    /// dropped, never surfaced to the command's caller.
    async fn react(&self, event: &MessageEvent, success: bool) {
        let Some(gateway) = current_gateway(&self.gateway) else {
            debug!(
                message_id = %event.message_id,
                "skipping result reaction: no gateway connection"
            );
            return;
        };
        let emoji = if success {
            SUCCESS_REACTION
        } else {
            FAILURE_REACTION
        };
        if let Err(e) = gateway
            .add_reaction(&event.channel_id, &event.message_id, emoji)
            .await
        {
            debug!(
                message_id = %event.message_id,
                "failed to add result reaction: {e}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        registry::FnCommand,
        state::{new_shared_gateway, publish_gateway},
        testutil::{FakeGateway, RecordingSink, journal_entries, message_event, new_journal},
    };

    #[test]
    fn tokenize_role_add_alice() {
        let parsed = parse_invocation("!", "!role add Alice")
            .unwrap_or_else(|| panic!("expected an invocation"));
        assert_eq!(parsed.name, "role");
        assert_eq!(parsed.args, vec!["add".to_string(), "Alice".to_string()]);
    }

    #[test]
    fn tokenize_preserves_argument_order_and_content() {
        let parsed = parse_invocation("!", "!echo  B  a   C")
            .unwrap_or_else(|| panic!("expected an invocation"));
        assert_eq!(parsed.name, "echo");
        assert_eq!(
            parsed.args,
            vec!["B".to_string(), "a".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn tokenize_without_prefix_yields_nothing() {
        assert!(parse_invocation("!", "role add Alice").is_none());
        // Prefix match is case-sensitive and exact.
        assert!(parse_invocation("!!", "!role").is_none());
    }

    #[test]
    fn bare_prefix_yields_nothing() {
        assert!(parse_invocation("!", "!").is_none());
        assert!(parse_invocation("!", "!   ").is_none());
    }

    #[test]
    fn multi_char_prefix() {
        let parsed = parse_invocation("$$", "$$ping")
            .unwrap_or_else(|| panic!("expected an invocation"));
        assert_eq!(parsed.name, "ping");
        assert!(parsed.args.is_empty());
    }

    struct Fixture {
        dispatcher: Dispatcher,
        sink: Arc<RecordingSink>,
        journal: crate::testutil::Journal,
    }

    fn fixture(command_result: bool) -> Fixture {
        let journal = new_journal();
        let registry = Arc::new(CommandRegistry::new());
        registry.register(Arc::new(FnCommand::new("role", "manage roles", {
            move |_ctx, _args| Box::pin(async move { command_result })
        })));
        let sink = Arc::new(RecordingSink::new(Arc::clone(&journal)));
        let sink_dyn: Arc<dyn EventSink> = sink.clone();
        let gateway = new_shared_gateway();
        publish_gateway(&gateway, Arc::new(FakeGateway::new(Arc::clone(&journal))));
        let dispatcher = Dispatcher::new(registry, sink_dyn, gateway, "!");
        Fixture {
            dispatcher,
            sink,
            journal,
        }
    }

    #[tokio::test]
    async fn successful_dispatch_reacts_then_notifies() {
        let fx = fixture(true);
        let event = message_event("300", "!role add Alice");
        let outcome = fx
            .dispatcher
            .dispatch(&event)
            .await
            .unwrap_or_else(|| panic!("expected a dispatch outcome"));
        assert!(outcome.success);
        assert_eq!(outcome.invocation.name, "role");

        let entries = journal_entries(&fx.journal);
        assert_eq!(
            entries,
            vec![
                format!("add_reaction:42:9001:{SUCCESS_REACTION}"),
                "event:onDiscordCommand".to_string(),
            ]
        );
        let events = fx.sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            HostEvent::DiscordCommand { name, args, event } => {
                assert_eq!(name, "role");
                assert_eq!(args, &vec!["add".to_string(), "Alice".to_string()]);
                assert_eq!(event.content, "!role add Alice");
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_command_gets_failure_reaction_and_notification() {
        let fx = fixture(false);
        let event = message_event("300", "!role add Alice");
        let outcome = fx
            .dispatcher
            .dispatch(&event)
            .await
            .unwrap_or_else(|| panic!("expected a dispatch outcome"));
        assert!(!outcome.success);

        let entries = journal_entries(&fx.journal);
        assert_eq!(
            entries,
            vec![
                format!("add_reaction:42:9001:{FAILURE_REACTION}"),
                "event:onDiscordCommand".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_command_is_silent() {
        let fx = fixture(true);
        let event = message_event("300", "!nosuchcommand now");
        assert!(fx.dispatcher.dispatch(&event).await.is_none());
        assert!(journal_entries(&fx.journal).is_empty());
        assert!(fx.sink.events().is_empty());
    }

    #[tokio::test]
    async fn prefix_only_message_is_silent() {
        let fx = fixture(true);
        let event = message_event("300", "!");
        assert!(fx.dispatcher.dispatch(&event).await.is_none());
        assert!(journal_entries(&fx.journal).is_empty());
    }

    #[tokio::test]
    async fn empty_content_is_silent() {
        let fx = fixture(true);
        let event = message_event("300", "");
        assert!(fx.dispatcher.dispatch(&event).await.is_none());
        assert!(journal_entries(&fx.journal).is_empty());
    }

    #[tokio::test]
    async fn reaction_failure_does_not_suppress_notification() {
        let journal = new_journal();
        let registry = Arc::new(CommandRegistry::new());
        registry.register(Arc::new(FnCommand::new("ping", "pong", |_ctx, _args| {
            Box::pin(async { true })
        })));
        let sink = Arc::new(RecordingSink::new(Arc::clone(&journal)));
        let sink_dyn: Arc<dyn EventSink> = sink.clone();
        let gateway = new_shared_gateway();
        let mut fake = FakeGateway::new(Arc::clone(&journal));
        fake.fail_reactions = true;
        publish_gateway(&gateway, Arc::new(fake));
        let dispatcher = Dispatcher::new(registry, sink_dyn, gateway, "!");

        let outcome = dispatcher
            .dispatch(&message_event("300", "!ping"))
            .await
            .unwrap_or_else(|| panic!("expected a dispatch outcome"));
        assert!(outcome.success);
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test]
    async fn missing_gateway_skips_reaction_but_still_notifies() {
        let journal = new_journal();
        let registry = Arc::new(CommandRegistry::new());
        registry.register(Arc::new(FnCommand::new("ping", "pong", |_ctx, _args| {
            Box::pin(async { true })
        })));
        let sink = Arc::new(RecordingSink::new(Arc::clone(&journal)));
        let sink_dyn: Arc<dyn EventSink> = sink.clone();
        let dispatcher = Dispatcher::new(registry, sink_dyn, new_shared_gateway(), "!");

        let outcome = dispatcher
            .dispatch(&message_event("300", "!ping"))
            .await
            .unwrap_or_else(|| panic!("expected a dispatch outcome"));
        assert!(outcome.success);
        assert_eq!(journal_entries(&journal), vec!["event:onDiscordCommand"]);
    }
}
