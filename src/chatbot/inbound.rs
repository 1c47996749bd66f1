//! Conversion of Discord messages into mediator input.

use poise::serenity_prelude::{Message as SerenityMessage, UserId as SerenityUserId};

use crate::media::first_image_url;
use crate::types::UserId;

/// Prompt used when an image arrives without a caption.
pub const DEFAULT_IMAGE_PROMPT: &str = "What is in this image?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Direct message with the bot
    Private,
    /// Guild channel shared with other users
    Group,
}

/// A message addressed to the bot, with any mention tag removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub user: UserId,
    pub chat_kind: ChatKind,
    pub text: String,
    pub image_url: Option<String>,
}

impl InboundMessage {
    /// Returns `None` for messages the bot should not answer.
    pub fn from_discord(message: &SerenityMessage, bot_user_id: SerenityUserId) -> Option<Self> {
        if message.author.bot {
            return None;
        }

        let chat_kind = if message.guild_id.is_some() {
            ChatKind::Group
        } else {
            ChatKind::Private
        };
        let mentioned = message.mentions_user_id(bot_user_id);
        let text = addressed_text(chat_kind, &message.content, bot_user_id.get(), mentioned)?;

        Some(Self {
            user: UserId::new(message.author.id.get()),
            chat_kind,
            text,
            image_url: first_image_url(&message.attachments),
        })
    }

    /// Caption for image messages, falling back to a generic question.
    #[must_use]
    pub fn image_prompt(&self) -> &str {
        if self.text.is_empty() {
            DEFAULT_IMAGE_PROMPT
        } else {
            &self.text
        }
    }
}

/// Text the bot should answer, or `None` if the message isn't addressed to it.
///
/// Group messages must mention the bot; private messages always count.
pub fn addressed_text(
    chat_kind: ChatKind,
    content: &str,
    bot_id: u64,
    mentioned: bool,
) -> Option<String> {
    if chat_kind == ChatKind::Group && !mentioned {
        return None;
    }
    Some(strip_bot_mention(content, bot_id))
}

/// Removes `<@id>` and `<@!id>` mention tags for the bot and trims the result.
#[must_use]
pub fn strip_bot_mention(content: &str, bot_id: u64) -> String {
    content
        .replace(&format!("<@{bot_id}>"), "")
        .replace(&format!("<@!{bot_id}>"), "")
        .trim()
        .to_string()
}
