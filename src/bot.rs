//! Discord bot core logic and event handling.

use std::sync::Arc;

use log::{debug, error, info, warn};
use poise::{
    Framework, FrameworkError, FrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents},
};

use crate::chatbot::{ChatMediator, handle_message};
use crate::commands::lifecycle_commands;
use crate::completion::OpenAiClient;
use crate::config::Config;
use crate::error::{BotError, Result};

/// Shared state handed to every event and command.
pub struct Data {
    mediator: ChatMediator,
}

impl Data {
    #[must_use]
    pub fn new(mediator: ChatMediator) -> Self {
        Self { mediator }
    }

    #[must_use]
    pub fn mediator(&self) -> &ChatMediator {
        &self.mediator
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing completion client");
    let client = OpenAiClient::new(
        config.openai_api_token.clone(),
        config.openai_api_url.clone(),
        config.request_timeout,
    )?;
    let mediator = ChatMediator::new(Arc::new(client));

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::DIRECT_MESSAGES;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: lifecycle_commands(),
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(Data::new(mediator))
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> Result<()> {
    if let FullEvent::Message { new_message } = event {
        let bot_user_id = ctx.cache.current_user().id;
        if new_message.author.id == bot_user_id {
            return Ok(());
        }
        handle_message(ctx, new_message, data, bot_user_id).await?;
    }
    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command '{}' from {} failed: {}",
                ctx.command().name,
                ctx.author().tag(),
                error
            );
            if let Err(e) = ctx.say(error.user_message()).await {
                warn!("Failed to report command error: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}
