use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    secrecy::ExposeSecret,
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use chatbridge_host::{EventSink, Plugin, Result, Translations};

use crate::{
    api::DiscordApi,
    bridge::{EventBridge, GatewayHandler, required_intents},
    commands::HelpCommand,
    config::DiscordConfig,
    dispatch::Dispatcher,
    gateway::SerenityGateway,
    registry::CommandRegistry,
    state::{
        SharedGateway, SharedIdentity, clear_identity, new_shared_gateway, new_shared_identity,
        publish_gateway, take_gateway,
    },
};

/// How long each shutdown phase waits for the lifecycle task.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Discord bridge plugin.
///
/// Owns the gateway connection lifecycle: `start` spawns one background
/// task running the serenity client, `shutdown` logs the bot out, stops
/// the task and drains it. Everything in between goes through the
/// shared gateway slot.
pub struct DiscordPlugin {
    config: DiscordConfig,
    registry: Arc<CommandRegistry>,
    translations: Arc<Translations>,
    sink: Arc<dyn EventSink>,
    /// Handle prepared at client build, not yet confirmed by a login.
    staged: SharedGateway,
    /// Handle of the live, logged-in connection.
    gateway: SharedGateway,
    identity: SharedIdentity,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DiscordPlugin {
    pub fn new(config: DiscordConfig, translations: Translations, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            registry: Arc::new(CommandRegistry::new()),
            translations: Arc::new(translations),
            sink,
            staged: new_shared_gateway(),
            gateway: new_shared_gateway(),
            identity: new_shared_identity(),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Registry other plugins add their commands to.
    pub fn registry(&self) -> Arc<CommandRegistry> {
        Arc::clone(&self.registry)
    }

    /// Facade other plugins call instead of the gateway client.
    pub fn api(&self) -> DiscordApi {
        DiscordApi::new(Arc::clone(&self.gateway))
    }
}

#[async_trait]
impl Plugin for DiscordPlugin {
    fn id(&self) -> &str {
        "discord"
    }

    fn name(&self) -> &str {
        "Discord"
    }

    async fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            warn!("discord plugin already started");
            return Ok(());
        }

        self.registry.register(Arc::new(HelpCommand::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.translations),
        )));

        if !self.config.token_is_usable() {
            warn!("discord bot token not configured; gateway connection disabled");
            return Ok(());
        }

        info!(prefix = %self.config.command_prefix, "starting discord plugin");

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.sink),
            Arc::clone(&self.gateway),
            self.config.command_prefix.clone(),
        ));
        let bridge = Arc::new(EventBridge::new(
            dispatcher,
            Arc::clone(&self.sink),
            Arc::clone(&self.identity),
            Arc::clone(&self.staged),
            Arc::clone(&self.gateway),
        ));

        let token = self.config.bot_token.expose_secret().clone();
        let staged = Arc::clone(&self.staged);
        let gateway = Arc::clone(&self.gateway);
        let identity = Arc::clone(&self.identity);
        let cancel = self.cancel.clone();

        self.task = Some(tokio::spawn(async move {
            let handler = GatewayHandler { bridge };
            let mut client = match serenity::Client::builder(&token, required_intents())
                .event_handler(handler)
                .await
            {
                Ok(c) => c,
                Err(e) => {
                    warn!("failed to build Discord client: {e}");
                    return;
                },
            };

            // Stage the connection handle; the bridge publishes it to
            // the facade and the dispatcher on the first `ready`, once
            // the login has actually been accepted.
            publish_gateway(
                &staged,
                Arc::new(SerenityGateway::new(
                    Arc::clone(&client.http),
                    Arc::clone(&client.shard_manager),
                )),
            );

            tokio::select! {
                result = client.start() => {
                    if let Err(e) = result {
                        warn!("Discord client stopped with error: {e}");
                    }
                }
                () = cancel.cancelled() => {
                    info!("Discord client shutting down");
                }
            }

            take_gateway(&staged);
            take_gateway(&gateway);
            clear_identity(&identity);
        }));

        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(gateway) = take_gateway(&self.gateway) {
            info!("logging out discord bot");
            gateway.logout().await;
        }
        // A staged handle never completed a login; drop it unlogged.
        take_gateway(&self.staged);
        clear_identity(&self.identity);
        self.cancel.cancel();

        let Some(mut task) = self.task.take() else {
            return;
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await.is_err() {
            warn!(
                timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                "discord lifecycle task still running; aborting"
            );
            task.abort();
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await.is_err() {
                warn!("discord lifecycle task did not terminate after abort");
            }
        }
    }
}
