use crate::domain::model::SnoopedElection;
use crate::domain::ports::Notifier;
use crate::utils::error::{ElectionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub const DEFAULT_CHANNEL: &str = "#election-snooper";
pub const DEFAULT_USERNAME: &str = "Election Snooper";
pub const DEFAULT_ICON_EMOJI: &str = ":satellite_antenna:";

pub fn notification_text(item: &SnoopedElection) -> String {
    format!(
        "Possible new election found: {}\n<{}>\nPlease go and investigate!",
        item.title, item.detail_url
    )
}

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    channel: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
    text: String,
}

/// Slack incoming webhook
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
    channel: String,
    username: String,
    icon_emoji: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.into(),
            channel: DEFAULT_CHANNEL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            icon_emoji: DEFAULT_ICON_EMOJI.to_string(),
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = icon_emoji.into();
        self
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn post(&self, item: &SnoopedElection) -> Result<()> {
        let message = SlackMessage {
            channel: &self.channel,
            username: &self.username,
            icon_emoji: &self.icon_emoji,
            text: notification_text(item),
        };

        tracing::debug!("📣 Posting to Slack channel {}", self.channel);
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ElectionError::NotificationError {
                message: format!("Slack webhook returned HTTP {}", response.status()),
            });
        }
        Ok(())
    }
}

/// 沒設定 webhook 時只寫 log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn post(&self, item: &SnoopedElection) -> Result<()> {
        tracing::info!("📣 {}", notification_text(item).replace('\n', " "));
        Ok(())
    }
}

pub enum ConfiguredNotifier {
    Slack(SlackNotifier),
    Log(LogNotifier),
}

#[async_trait]
impl Notifier for ConfiguredNotifier {
    async fn post(&self, item: &SnoopedElection) -> Result<()> {
        match self {
            ConfiguredNotifier::Slack(slack) => slack.post(item).await,
            ConfiguredNotifier::Log(log) => log.post(item).await,
        }
    }
}
