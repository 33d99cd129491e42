use std::sync::Arc;

use {async_trait::async_trait, tracing::warn};

use chatbridge_host::Translations;

use crate::{
    gateway::EmbedSpec,
    registry::{Command, CommandContext, CommandRegistry},
    state::current_gateway,
};

/// Embed color for help output on the happy path.
pub const HELP_SUCCESS_COLOR: u32 = 0x0020_B2AA;
/// Embed color for the "not found" reply.
pub const HELP_FAILURE_COLOR: u32 = 0x00ED_4245;

/// Built-in `help` command: lists every registered command, or
/// describes a single one when given its name.
pub struct HelpCommand {
    registry: Arc<CommandRegistry>,
    translations: Arc<Translations>,
}

impl HelpCommand {
    pub fn new(registry: Arc<CommandRegistry>, translations: Arc<Translations>) -> Self {
        Self {
            registry,
            translations,
        }
    }

    /// Comma-joined, prefix-qualified list of every registered command,
    /// in name order so the output is stable.
    fn command_list(&self, prefix: &str) -> String {
        let mut names: Vec<String> = self
            .registry
            .snapshot()
            .iter()
            .map(|command| format!("{prefix}{}", command.name()))
            .collect();
        names.sort();
        format!(
            "{}\n{}",
            self.translations.get("translation.help.contentTitle"),
            names.join(", ")
        )
    }

    /// Case-insensitive lookup over a registry snapshot. Returns the
    /// reply body and whether the command was found.
    fn describe(&self, prefix: &str, name: &str) -> (String, bool) {
        let found = self
            .registry
            .snapshot()
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name));
        match found {
            Some(command) => (
                format!("**{prefix}{}** - {}", command.name(), command.description()),
                true,
            ),
            None => (
                self.translations
                    .get("translation.help.notFound")
                    .replace("<COMMAND>", &format!("{prefix}{name}")),
                false,
            ),
        }
    }

    async fn reply(&self, ctx: &CommandContext, description: String, color: u32) {
        let Some(gateway) = current_gateway(&ctx.gateway) else {
            warn!("help reply dropped: no gateway connection");
            return;
        };
        let embed = EmbedSpec {
            title: self
                .translations
                .get("translation.help.embedTitle")
                .to_string(),
            description,
            color,
        };
        if let Err(e) = gateway.send_embed(&ctx.message.channel_id, &embed).await {
            warn!(channel_id = %ctx.message.channel_id, "failed to send help embed: {e}");
        }
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        self.translations.get("translation.help.description")
    }

    async fn execute(&self, ctx: &CommandContext, args: &[String]) -> bool {
        match args.first() {
            None => {
                let description = self.command_list(&ctx.prefix);
                self.reply(ctx, description, HELP_SUCCESS_COLOR).await;
                true
            },
            Some(name) => {
                let (description, found) = self.describe(&ctx.prefix, name);
                let color = if found {
                    HELP_SUCCESS_COLOR
                } else {
                    HELP_FAILURE_COLOR
                };
                self.reply(ctx, description, color).await;
                // An unknown name is a failed help invocation, even
                // though the reply itself went out.
                found
            },
        }
    }
}
