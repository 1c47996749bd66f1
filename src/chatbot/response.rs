//! Response sending utilities for Discord.

use log::{debug, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::error::Result;

/// Discord's message limit for standard users, in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Splits `text` into chunks of at most `limit` characters.
///
/// Prefers breaking after the last newline inside a chunk, then after the
/// last whitespace, and only cuts mid-word when neither exists.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let hard_end = rest
            .char_indices()
            .nth(limit)
            .map_or(rest.len(), |(idx, _)| idx);
        let window = &rest[..hard_end];

        let end = window
            .char_indices()
            .rev()
            .find(|&(_, c)| c == '\n')
            .or_else(|| window.char_indices().rev().find(|&(_, c)| c.is_whitespace()))
            .filter(|&(idx, _)| idx > 0)
            .map_or(hard_end, |(idx, c)| idx + c.len_utf8());

        let chunk = rest[..end].trim_end();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        rest = &rest[end..];
    }

    if !rest.trim().is_empty() || chunks.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Reply to `new_message` with `text`, split to fit Discord's limit.
pub async fn send_reply(ctx: &Context, new_message: &SerenityMessage, text: &str) -> Result<()> {
    let chunks = split_message(text, DISCORD_MESSAGE_LIMIT);
    debug!("Sending reply in {} chunk(s)", chunks.len());

    let mut chunks = chunks.iter();
    if let Some(first) = chunks.next() {
        new_message.reply(&ctx.http, first).await?;
    }
    for chunk in chunks {
        new_message.channel_id.say(&ctx.http, chunk).await?;
    }

    info!(
        "Replied to {} in channel {}: {}",
        new_message.author.tag(),
        new_message.channel_id,
        text
    );
    Ok(())
}
