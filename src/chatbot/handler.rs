//! Main handler for messages addressed to the bot.

use std::fmt::Write;

use log::{debug, error, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage, UserId as SerenityUserId};
use strum::VariantNames;

use crate::bot::Data;
use crate::error::Result;
use crate::types::ModelId;

use super::inbound::InboundMessage;
use super::mediator::{ImageReply, Reply};
use super::response::send_reply;

/// Handle a Discord message: answer it if it is addressed to the bot.
pub async fn handle_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    bot_user_id: SerenityUserId,
) -> Result<()> {
    let Some(inbound) = InboundMessage::from_discord(new_message, bot_user_id) else {
        return Ok(());
    };

    if inbound.text.is_empty() && inbound.image_url.is_none() {
        debug!(
            "Ignoring empty message from {} in channel {}",
            new_message.author.tag(),
            new_message.channel_id
        );
        return Ok(());
    }

    info!(
        "Received {:?} message from {} in channel {}: {}",
        inbound.chat_kind,
        new_message.author.tag(),
        new_message.channel_id,
        inbound.text
    );

    if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    let mediator = data.mediator();
    let outcome = match &inbound.image_url {
        Some(image_url) => mediator
            .respond_with_image(inbound.user, inbound.image_prompt(), image_url)
            .await
            .map(Outcome::Image),
        None => mediator
            .respond(inbound.user, &inbound.text)
            .await
            .map(Outcome::Text),
    };

    match outcome {
        Ok(Outcome::Text(Reply::Text(text))) => send_reply(ctx, new_message, &text).await?,
        Ok(Outcome::Text(Reply::ModelNotSelected)) => {
            info!("User {} has not selected a model yet", inbound.user);
            send_reply(ctx, new_message, &model_prompt()).await?;
        }
        Ok(Outcome::Image(ImageReply { text, switched_to })) => {
            if let Some(model) = switched_to {
                new_message
                    .channel_id
                    .say(
                        &ctx.http,
                        format!("Switched your model to **{model}** to read the image."),
                    )
                    .await?;
            }
            send_reply(ctx, new_message, &text).await?;
        }
        Err(e) => {
            error!(
                "Error processing message from {}: {}",
                new_message.author.tag(),
                e
            );
            new_message.reply(&ctx.http, e.user_message()).await?;
        }
    }

    Ok(())
}

enum Outcome {
    Text(Reply),
    Image(ImageReply),
}

/// Sentinel reply plus the list of models to choose from.
pub(crate) fn model_prompt() -> String {
    let mut prompt = format!(
        "{} Choose one with `/model`:",
        Reply::ModelNotSelected.text()
    );
    for name in ModelId::VARIANTS {
        let _ = write!(prompt, "\n- `{name}`");
    }
    prompt
}
