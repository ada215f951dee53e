mod discord_commands;
mod telegram;

use std::sync::Arc;

use poise::{Framework, FrameworkOptions, serenity_prelude as serenity};
use saguaro_api::ApiClient;
use saguaro_bot::{config::Config, create_app};
use tokio::net::TcpListener;

type Context<'a> = poise::Context<'a, crate::Data, crate::discord_commands::Error>;

pub(crate) struct Data {
    pub(crate) client: Arc<ApiClient>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing for structured logging
    #[cfg(debug_assertions)]
    let log_level = tracing::Level::DEBUG;
    #[cfg(not(debug_assertions))]
    let log_level = tracing::Level::INFO;

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();
    tracing::info!("Starting saguaro...");

    let config = Config::from_env();
    tracing::info!(
        "Configuration: api_url={}, timeout={}s, delay={}ms, port={}",
        config.api_url,
        config.request_timeout.as_secs(),
        config.request_delay.as_millis(),
        config.port
    );
    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set, player lookups will report 'not configured'");
    }

    // Missing chat credentials are fatal: the bot is useless without them.
    let Some(discord_token) = config.discord_token.clone() else {
        tracing::error!("DISCORD_TOKEN is not set in environment");
        std::process::exit(1);
    };
    let Some(telegram_token) = config.telegram_token.clone() else {
        tracing::error!("TELEGRAM_TOKEN is not set in environment");
        std::process::exit(1);
    };

    let client =
        Arc::new(ApiClient::new(config.client_config()).expect("Error creating API client"));

    let app = create_app(config.request_timeout);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Keepalive endpoint listening on {}", addr);

    // prefix commands need message content on top of the default intents
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework_client = client.clone();
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![
                discord_commands::servers(),
                discord_commands::online(),
                discord_commands::stats(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.discord_command_prefix.clone()),
                ..Default::default()
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        "Executing command '{}' by user '{}'",
                        ctx.command().name,
                        ctx.author().name
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        "Finished command '{}' by user '{}'",
                        ctx.command().name,
                        ctx.author().name
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let client = framework_client.clone();
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data { client })
            })
        })
        .build();

    let mut discord_client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .await
        .expect("Error creating Discord client");

    let telegram_bot = telegram::TelegramBot::new(telegram_token, client.clone())
        .expect("Error creating Telegram client");

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!("Keepalive server error: {}", e);
            }
        }
        result = discord_client.start() => {
            if let Err(e) = result {
                tracing::error!("Discord client error: {:?}", e);
            }
        }
        result = telegram_bot.run() => {
            if let Err(e) = result {
                tracing::error!("Telegram poller error: {:?}", e);
            }
        }
    }
}
