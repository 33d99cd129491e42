use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Placeholder token value shipped in the default config file; treated
/// the same as an unset token.
pub const TOKEN_PLACEHOLDER: &str = "...";

/// Default leading character sequence marking a message as a command.
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Configuration for the Discord bridge plugin.
///
/// Field names follow the host config file (`botToken`,
/// `commandPrefix`).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscordConfig {
    /// Discord bot token.
    #[serde(serialize_with = "serialize_secret")]
    pub bot_token: Secret<String>,

    /// Command prefix, compared byte-for-byte against message content.
    pub command_prefix: String,
}

impl DiscordConfig {
    /// Whether the configured token can be used to start the bot. An
    /// empty or placeholder token disables startup without being an
    /// error.
    pub fn token_is_usable(&self) -> bool {
        let token = self.bot_token.expose_secret();
        !token.is_empty() && token != TOKEN_PLACEHOLDER
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"[REDACTED]")
            .field("command_prefix", &self.command_prefix)
            .finish()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: Secret::new(String::new()),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
