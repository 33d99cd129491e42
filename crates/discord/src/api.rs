use std::sync::Arc;

use tracing::warn;

use chatbridge_host::Result;

use crate::{
    gateway::{ChannelInfo, EmbedSpec, Gateway, UserInfo, WebhookPayload},
    state::{SharedGateway, current_gateway},
};

/// Stable surface other plugins call instead of the gateway client.
///
/// Every operation follows the same guard contract: with no live
/// connection it logs one diagnostic line and returns an empty result;
/// otherwise it forwards to the connection and returns its result
/// unmodified. Nothing here retries, blocks waiting for a connection,
/// or panics.
pub struct DiscordApi {
    gateway: SharedGateway,
}

impl DiscordApi {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    fn live(&self, op: &str) -> Option<Arc<dyn Gateway>> {
        let gateway = current_gateway(&self.gateway);
        if gateway.is_none() {
            warn!(op, "discord api call ignored: no gateway connection");
        }
        gateway
    }

    pub async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        let Some(gateway) = self.live("send_message") else {
            return Ok(());
        };
        gateway.send_message(channel_id, text).await
    }

    pub async fn send_embed(&self, channel_id: &str, embed: &EmbedSpec) -> Result<()> {
        let Some(gateway) = self.live("send_embed") else {
            return Ok(());
        };
        gateway.send_embed(channel_id, embed).await
    }

    pub async fn execute_webhook(
        &self,
        webhook_id: u64,
        token: &str,
        payload: &WebhookPayload,
    ) -> Result<()> {
        let Some(gateway) = self.live("execute_webhook") else {
            return Ok(());
        };
        gateway.execute_webhook(webhook_id, token, payload).await
    }

    pub async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        let Some(gateway) = self.live("delete_message") else {
            return Ok(());
        };
        gateway.delete_message(channel_id, message_id).await
    }

    pub async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<()> {
        let Some(gateway) = self.live("edit_message") else {
            return Ok(());
        };
        gateway.edit_message(channel_id, message_id, content).await
    }

    pub async fn fetch_user(&self, user_id: &str) -> Result<Option<UserInfo>> {
        let Some(gateway) = self.live("fetch_user") else {
            return Ok(None);
        };
        gateway.fetch_user(user_id).await
    }

    pub async fn fetch_channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>> {
        let Some(gateway) = self.live("fetch_channel") else {
            return Ok(None);
        };
        gateway.fetch_channel(channel_id).await
    }

    pub async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let Some(gateway) = self.live("add_reaction") else {
            return Ok(());
        };
        gateway.add_reaction(channel_id, message_id, emoji).await
    }

    pub async fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let Some(gateway) = self.live("remove_reaction") else {
            return Ok(());
        };
        gateway
            .remove_reaction(channel_id, message_id, user_id, emoji)
            .await
    }

    pub async fn remove_own_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let Some(gateway) = self.live("remove_own_reaction") else {
            return Ok(());
        };
        gateway
            .remove_own_reaction(channel_id, message_id, emoji)
            .await
    }
}
