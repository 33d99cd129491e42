//! Recording fakes shared by the dispatcher, bridge, facade and help
//! command tests. A single journal keeps gateway calls and emitted
//! events in one ordered log so tests can assert on their interleaving.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chatbridge_host::{Error, EventSink, HostEvent, MessageEvent, Result};

use crate::gateway::{ChannelInfo, EmbedSpec, Gateway, UserInfo, WebhookPayload};

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn journal_entries(journal: &Journal) -> Vec<String> {
    let entries = journal.lock().unwrap_or_else(|e| e.into_inner());
    entries.clone()
}

fn record(journal: &Journal, entry: String) {
    let mut entries = journal.lock().unwrap_or_else(|e| e.into_inner());
    entries.push(entry);
}

pub fn message_event(author_id: &str, content: &str) -> MessageEvent {
    MessageEvent {
        message_id: "9001".into(),
        channel_id: "42".into(),
        author_id: author_id.into(),
        author_name: "alice".into(),
        author_display_name: Some("Alice A.".into()),
        content: content.into(),
    }
}

/// Gateway fake writing every call into the journal.
pub struct FakeGateway {
    journal: Journal,
    pub fail_reactions: bool,
}

impl FakeGateway {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail_reactions: false,
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        record(&self.journal, format!("send_message:{channel_id}:{text}"));
        Ok(())
    }

    async fn send_embed(&self, channel_id: &str, embed: &EmbedSpec) -> Result<()> {
        record(
            &self.journal,
            format!(
                "send_embed:{channel_id}:{:#08x}:{}:{}",
                embed.color, embed.title, embed.description
            ),
        );
        Ok(())
    }

    async fn execute_webhook(
        &self,
        webhook_id: u64,
        _token: &str,
        payload: &WebhookPayload,
    ) -> Result<()> {
        record(
            &self.journal,
            format!(
                "execute_webhook:{webhook_id}:{}",
                payload.content.as_deref().unwrap_or_default()
            ),
        );
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        record(
            &self.journal,
            format!("delete_message:{channel_id}:{message_id}"),
        );
        Ok(())
    }

    async fn edit_message(&self, channel_id: &str, message_id: &str, content: &str) -> Result<()> {
        record(
            &self.journal,
            format!("edit_message:{channel_id}:{message_id}:{content}"),
        );
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserInfo>> {
        record(&self.journal, format!("fetch_user:{user_id}"));
        Ok(Some(UserInfo {
            id: user_id.into(),
            name: "someone".into(),
            display_name: None,
            is_bot: false,
        }))
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>> {
        record(&self.journal, format!("fetch_channel:{channel_id}"));
        Ok(Some(ChannelInfo {
            id: channel_id.into(),
            name: Some("general".into()),
            guild_id: None,
        }))
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()> {
        record(
            &self.journal,
            format!("add_reaction:{channel_id}:{message_id}:{emoji}"),
        );
        if self.fail_reactions {
            Err(Error::external(
                "Discord reaction",
                std::io::Error::other("simulated failure"),
            ))
        } else {
            Ok(())
        }
    }

    async fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<()> {
        record(
            &self.journal,
            format!("remove_reaction:{channel_id}:{message_id}:{user_id}:{emoji}"),
        );
        Ok(())
    }

    async fn remove_own_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()> {
        record(
            &self.journal,
            format!("remove_own_reaction:{channel_id}:{message_id}:{emoji}"),
        );
        Ok(())
    }

    async fn logout(&self) {
        record(&self.journal, "logout".to_string());
    }
}

/// Event sink fake keeping both the journal ordering and the full
/// events for structural assertions.
pub struct RecordingSink {
    journal: Journal,
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingSink {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: HostEvent) {
        record(&self.journal, format!("event:{}", event.name()));
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }
}
