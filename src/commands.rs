//! Poise slash commands for conversation lifecycle.

use std::fmt::Write;
use std::str::FromStr;

use log::info;
use strum::VariantNames;

use crate::bot::Data;
use crate::chatbot::model_prompt;
use crate::error::{BotError, Result};
use crate::types::{ModelId, ModelSelection, UserId};

/// Context type for lifecycle commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

const START_TEXT: &str = "Hi there! I relay your messages to an AI model and keep track of our conversation. \
Pick a model with `/model`, then just send me a message (mention me in server channels).";

fn author_id(ctx: Context<'_>) -> UserId {
    UserId::new(ctx.author().id.get())
}

fn help_text() -> String {
    let mut text = String::from(
        "**Commands**\n\
         `/start` - introduction\n\
         `/help` - this message\n\
         `/clear` - forget our conversation so far\n\
         `/model [name]` - show or choose the AI model\n\n\
         **Models**",
    );
    for name in ModelId::VARIANTS {
        let _ = write!(text, "\n- `{name}`");
    }
    text.push_str("\n\nImages you send are answered by the vision model.");
    text
}

fn matching_models(partial: &str) -> Vec<String> {
    let partial = partial.trim().to_lowercase();
    ModelId::VARIANTS
        .iter()
        .filter(|name| name.contains(partial.as_str()))
        .map(ToString::to_string)
        .collect()
}

async fn autocomplete_model(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_models(partial)
}

/// Introduce the bot.
#[poise::command(slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<()> {
    ctx.say(START_TEXT).await?;
    Ok(())
}

/// List commands and available models.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    ctx.say(help_text()).await?;
    Ok(())
}

/// Forget the conversation so far.
#[poise::command(slash_command)]
pub async fn clear(ctx: Context<'_>) -> Result<()> {
    let user = author_id(ctx);
    ctx.data().mediator().clear(user).await;
    info!("Cleared conversation for {}", ctx.author().tag());

    ctx.say("Conversation cleared. Let's start fresh!").await?;
    Ok(())
}

/// Show or choose the AI model.
#[poise::command(slash_command)]
pub async fn model(
    ctx: Context<'_>,
    #[description = "Model to use (leave empty to see the current one)"]
    #[autocomplete = "autocomplete_model"]
    name: Option<String>,
) -> Result<()> {
    let user = author_id(ctx);
    let mediator = ctx.data().mediator();

    let Some(name) = name else {
        let reply = match mediator.get_model(user).await {
            Some(ModelSelection::Selected(model)) => format!("You are using **{model}**."),
            Some(ModelSelection::Unselected) | None => model_prompt(),
        };
        ctx.say(reply).await?;
        return Ok(());
    };

    let model = ModelId::from_str(name.trim())
        .map_err(|_| BotError::InvalidInput(format!("'{}' is not a model I know", name.trim())))?;
    mediator.set_model(user, model).await;
    info!("{} selected model {}", ctx.author().tag(), model);

    ctx.say(format!("Model set to **{model}**.")).await?;
    Ok(())
}

/// Get available lifecycle commands.
#[must_use]
pub fn lifecycle_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![start(), help(), clear(), model()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autocomplete_filters_by_substring() {
        assert_eq!(
            matching_models("vision"),
            vec!["gpt-4-vision-preview".to_string()]
        );
        assert_eq!(matching_models("GPT-4").len(), 2);
        assert_eq!(matching_models("").len(), ModelId::VARIANTS.len());
        assert!(matching_models("claude").is_empty());
    }

    #[test]
    fn help_mentions_every_command_and_model() {
        let text = help_text();
        for command in ["/start", "/help", "/clear", "/model"] {
            assert!(text.contains(command));
        }
        for name in ModelId::VARIANTS {
            assert!(text.contains(name));
        }
    }
}
