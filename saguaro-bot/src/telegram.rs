//! Telegram frontend: a long-poll loop over the Bot API.
//!
//! Command receipt is `getUpdates` with a long-poll window and replies go
//! out through `sendMessage`; a framework would be more machinery than
//! three commands are worth.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use saguaro_api::{ApiClient, format, servers};
use saguaro_bot::helpers::{chunk_message, parse_stats_args, split_command};
use serde::{Deserialize, Serialize};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
/// Long-poll window for getUpdates.
const POLL_TIMEOUT_SECS: u64 = 50;
/// Telegram caps messages at 4096 characters; stay under it with headroom.
const MESSAGE_LIMIT: usize = 4000;

const HELP_TEXT: &str = "👋 Hi! I'm saguaro, the Arizona RP stats bot.\n\n\
    Commands:\n\
    /servers — live server list with player counts\n\
    /online — per-server online summary\n\
    /stats <nickname> <server id> — player statistics\n\n\
    Example: /stats Vlad_Mensem 18";

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

pub(crate) struct TelegramBot {
    http: reqwest::Client,
    token: String,
    client: Arc<ApiClient>,
}

impl TelegramBot {
    pub fn new(token: String, client: Arc<ApiClient>) -> reqwest::Result<Self> {
        // the poll request itself stays open for POLL_TIMEOUT_SECS, so the
        // HTTP timeout must sit above it
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()?;
        Ok(Self {
            http,
            token,
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{TELEGRAM_API_BASE}/bot{}/{method}", self.token)
    }

    /// Poll for updates forever, dispatching each command message.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("Telegram long-poll loop started");
        let mut offset: i64 = 0;
        loop {
            match self.poll_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(message) = update.message else { continue };
                        let Some(text) = message.text.as_deref() else { continue };
                        if let Err(err) = self.handle_message(message.chat.id, text).await {
                            tracing::warn!(error = %err, "failed to handle telegram message");
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "telegram getUpdates failed, backing off");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    async fn poll_updates(&self, offset: i64) -> anyhow::Result<Vec<Update>> {
        let response: UpdatesResponse = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset), ("timeout", POLL_TIMEOUT_SECS as i64)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("unexpected getUpdates payload")?;
        if !response.ok {
            anyhow::bail!("telegram API reported ok=false");
        }
        Ok(response.result)
    }

    async fn handle_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let Some((command, args)) = split_command(text) else {
            return Ok(());
        };
        tracing::info!(command, chat_id, "telegram command");
        match command {
            "start" | "help" => self.send(chat_id, HELP_TEXT).await,
            "servers" => {
                let text = self.client.servers_status_from_api().await;
                self.send(chat_id, &text).await
            }
            "online" => {
                let statuses = self.client.fetch_all_servers_status().await;
                self.send(chat_id, &format::format_status_map(&statuses)).await
            }
            "stats" => self.cmd_stats(chat_id, args).await,
            _ => Ok(()),
        }
    }

    async fn cmd_stats(&self, chat_id: i64, args: &str) -> anyhow::Result<()> {
        let (nickname, server_id) = match parse_stats_args(args) {
            Ok(parsed) => parsed,
            Err(message) => return self.send(chat_id, &message).await,
        };
        if let Err(err) = servers::validate_nickname(&nickname) {
            return self.send(chat_id, &format!("❌ {err}")).await;
        }
        if let Err(err) = servers::validate_server_id(server_id) {
            return self.send(chat_id, &format!("❌ {err}")).await;
        }

        match self.client.fetch_player_stats(&nickname, server_id).await {
            Ok(record) => {
                self.send(chat_id, &format::format_stats(&record, &nickname, server_id))
                    .await
            }
            Err(err) => self.send(chat_id, &err.user_message()).await,
        }
    }

    async fn send(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        for chunk in chunk_message(text, MESSAGE_LIMIT) {
            self.http
                .post(self.method_url("sendMessage"))
                .json(&SendMessage {
                    chat_id,
                    text: &chunk,
                })
                .send()
                .await?
                .error_for_status()?;
        }
        Ok(())
    }
}
