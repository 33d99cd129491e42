use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready},
    tracing::info,
};

use chatbridge_host::{EventSink, HostEvent, MessageEvent};

use crate::{
    dispatch::Dispatcher,
    state::{
        BotIdentity, SharedGateway, SharedIdentity, current_identity, publish_gateway,
        set_identity, take_gateway,
    },
};

/// Required gateway intents for the bridge.
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
}

/// Funnels raw gateway events into host-wide notifications and the
/// command dispatcher.
///
/// Disconnected until a login completes; a stream termination simply
/// ends that state. Reconnection is a fresh login cycle owned by the
/// plugin lifecycle, never by this bridge.
pub struct EventBridge {
    dispatcher: Arc<Dispatcher>,
    sink: Arc<dyn EventSink>,
    identity: SharedIdentity,
    staged: SharedGateway,
    gateway: SharedGateway,
}

impl EventBridge {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        sink: Arc<dyn EventSink>,
        identity: SharedIdentity,
        staged: SharedGateway,
        gateway: SharedGateway,
    ) -> Self {
        Self {
            dispatcher,
            sink,
            identity,
            staged,
            gateway,
        }
    }

    /// Record the bot's own identity and expose the connection handle,
    /// reported once per login.
    ///
    /// The handle is staged by the lifecycle task when the client is
    /// built; it only becomes visible to the facade and the dispatcher
    /// here, once the gateway has actually accepted the login.
    pub fn on_ready(&self, identity: BotIdentity) {
        if let Some(handle) = take_gateway(&self.staged) {
            publish_gateway(&self.gateway, handle);
        }
        info!(
            bot_user = %identity.username,
            bot_id = identity.user_id,
            "discord bot logged in as {}",
            identity.username
        );
        set_identity(&self.identity, identity);
    }

    /// Intake for one inbound message.
    ///
    /// Self-authored and empty messages are discarded without any
    /// notification. Everything else emits `onDiscordMessage` exactly
    /// once, then goes to the dispatcher when it carries the prefix.
    pub async fn on_message(&self, event: MessageEvent) {
        if event.author_id.is_empty() {
            return;
        }
        if let Some(own) = current_identity(&self.identity)
            && own.user_id.to_string() == event.author_id
        {
            return;
        }
        if event.content.is_empty() {
            return;
        }

        self.sink
            .emit(HostEvent::DiscordMessage {
                event: event.clone(),
            })
            .await;

        if event.content.starts_with(self.dispatcher.prefix()) {
            self.dispatcher.dispatch(&event).await;
        }
    }
}

/// Serenity-facing shim translating library events into bridge intake.
pub struct GatewayHandler {
    pub bridge: Arc<EventBridge>,
}

fn message_event_from(msg: &Message) -> MessageEvent {
    MessageEvent {
        message_id: msg.id.to_string(),
        channel_id: msg.channel_id.to_string(),
        author_id: msg.author.id.to_string(),
        author_name: msg.author.name.clone(),
        author_display_name: msg.author.global_name.clone(),
        content: msg.content.clone(),
    }
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn message(&self, _ctx: Context, msg: Message) {
        self.bridge.on_message(message_event_from(&msg)).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.bridge.on_ready(BotIdentity {
            user_id: ready.user.id.get(),
            username: ready.user.name.clone(),
        });
    }
}
