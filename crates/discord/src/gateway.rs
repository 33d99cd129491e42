use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::all::{
        Channel, ChannelId, CreateEmbed, CreateMessage, EditMessage, ExecuteWebhook, MessageId,
        ReactionType, UserId, WebhookId,
    },
};

use chatbridge_host::{Error as HostError, Result};

use crate::error::Error;

/// Structured, styled message payload distinct from plain text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSpec {
    pub title: String,
    pub description: String,
    /// RGB color, e.g. `0x20B2AA`.
    pub color: u32,
}

/// Payload for a webhook execution: plain content, an embed, or both.
#[derive(Debug, Clone, Default)]
pub struct WebhookPayload {
    pub content: Option<String>,
    pub embed: Option<EmbedSpec>,
}

/// Remote user details, reduced to what other plugins consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub is_bot: bool,
}

/// Remote channel details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub name: Option<String>,
    pub guild_id: Option<String>,
}

/// Operations available on an authenticated gateway connection.
///
/// Entities are referenced by opaque string ids only; implementations
/// own the conversion into gateway-library types. No retry logic lives
/// here: a remote failure surfaces as the returned error.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()>;
    async fn send_embed(&self, channel_id: &str, embed: &EmbedSpec) -> Result<()>;
    async fn execute_webhook(
        &self,
        webhook_id: u64,
        token: &str,
        payload: &WebhookPayload,
    ) -> Result<()>;
    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()>;
    async fn edit_message(&self, channel_id: &str, message_id: &str, content: &str) -> Result<()>;
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserInfo>>;
    async fn fetch_channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>>;
    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()>;
    async fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<()>;
    async fn remove_own_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()>;

    /// End the session with the remote service.
    async fn logout(&self);
}

/// Parse an opaque snowflake string. Discord ids are nonzero u64s.
fn parse_snowflake(kind: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(HostError::invalid_input(format!(
            "invalid Discord {kind} ID: {value}"
        ))),
    }
}

fn build_embed(spec: &EmbedSpec) -> CreateEmbed {
    CreateEmbed::new()
        .title(&spec.title)
        .description(&spec.description)
        .color(spec.color)
}

/// Live connection backed by a serenity client.
pub struct SerenityGateway {
    http: Arc<serenity::http::Http>,
    shard_manager: Arc<serenity::gateway::ShardManager>,
}

impl SerenityGateway {
    pub fn new(
        http: Arc<serenity::http::Http>,
        shard_manager: Arc<serenity::gateway::ShardManager>,
    ) -> Self {
        Self {
            http,
            shard_manager,
        }
    }

    fn channel(channel_id: &str) -> Result<ChannelId> {
        parse_snowflake("channel", channel_id).map(ChannelId::new)
    }

    fn message(message_id: &str) -> Result<MessageId> {
        parse_snowflake("message", message_id).map(MessageId::new)
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        channel
            .send_message(&self.http, CreateMessage::new().content(text))
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn send_embed(&self, channel_id: &str, embed: &EmbedSpec) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        channel
            .send_message(&self.http, CreateMessage::new().embed(build_embed(embed)))
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn execute_webhook(
        &self,
        webhook_id: u64,
        token: &str,
        payload: &WebhookPayload,
    ) -> Result<()> {
        let webhook = self
            .http
            .get_webhook_with_token(WebhookId::new(webhook_id), token)
            .await
            .map_err(|e| Error::Gateway(e.to_string()))?;
        let mut execute = ExecuteWebhook::new();
        if let Some(ref content) = payload.content {
            execute = execute.content(content);
        }
        if let Some(ref embed) = payload.embed {
            execute = execute.embed(build_embed(embed));
        }
        webhook
            .execute(&self.http, false, execute)
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        let message = Self::message(message_id)?;
        self.http
            .delete_message(channel, message, None)
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn edit_message(&self, channel_id: &str, message_id: &str, content: &str) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        let message = Self::message(message_id)?;
        channel
            .edit_message(&self.http, message, EditMessage::new().content(content))
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserInfo>> {
        let user_id = parse_snowflake("user", user_id).map(UserId::new)?;
        let user = self
            .http
            .get_user(user_id)
            .await
            .map_err(|e| Error::Gateway(e.to_string()))?;
        Ok(Some(UserInfo {
            id: user.id.to_string(),
            name: user.name.clone(),
            display_name: user.global_name.clone(),
            is_bot: user.bot,
        }))
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>> {
        let channel = Self::channel(channel_id)?;
        let channel = self
            .http
            .get_channel(channel)
            .await
            .map_err(|e| Error::Gateway(e.to_string()))?;
        let info = match channel {
            Channel::Guild(ch) => ChannelInfo {
                id: ch.id.to_string(),
                name: Some(ch.name.clone()),
                guild_id: Some(ch.guild_id.to_string()),
            },
            Channel::Private(ch) => ChannelInfo {
                id: ch.id.to_string(),
                name: Some(ch.recipient.name.clone()),
                guild_id: None,
            },
            other => ChannelInfo {
                id: other.id().to_string(),
                name: None,
                guild_id: None,
            },
        };
        Ok(Some(info))
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        let message = Self::message(message_id)?;
        self.http
            .create_reaction(channel, message, &ReactionType::Unicode(emoji.to_string()))
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        let message = Self::message(message_id)?;
        let user = parse_snowflake("user", user_id).map(UserId::new)?;
        self.http
            .delete_reaction(
                channel,
                message,
                user,
                &ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn remove_own_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let channel = Self::channel(channel_id)?;
        let message = Self::message(message_id)?;
        self.http
            .delete_reaction_me(channel, message, &ReactionType::Unicode(emoji.to_string()))
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn logout(&self) {
        self.shard_manager.shutdown_all().await;
    }
}
