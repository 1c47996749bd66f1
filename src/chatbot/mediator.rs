//! Turns one user utterance into one model reply.

use std::sync::Arc;

use log::{debug, info};
use url::Url;

use crate::completion::{CompletionApi, CompletionRequest, Message};
use crate::conversation::ConversationStore;
use crate::error::{BotError, Result};
use crate::types::{ModelId, ModelSelection, UserId};

/// Sentinel reply returned while a user has no model selected.
pub const MODEL_NOT_SELECTED: &str = "Model not selected.";

/// Response token cap for image messages.
pub const IMAGE_MAX_TOKENS: u32 = 400;

/// Outcome of a text turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Reply generated by the model.
    Text(String),
    /// No model selected yet; the completion API was not called.
    ModelNotSelected,
}

impl Reply {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::ModelNotSelected => MODEL_NOT_SELECTED,
        }
    }
}

/// Outcome of an image turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReply {
    pub text: String,
    /// Set when the turn forced the user onto the vision model.
    pub switched_to: Option<ModelId>,
}

pub struct ChatMediator {
    store: ConversationStore,
    client: Arc<dyn CompletionApi>,
}

impl ChatMediator {
    pub fn new(client: Arc<dyn CompletionApi>) -> Self {
        Self {
            store: ConversationStore::new(),
            client,
        }
    }

    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Appends `prompt` to the user's transcript and returns the model's reply.
    ///
    /// On a completion failure the user message stays in the transcript and
    /// no assistant message is added.
    pub async fn respond(&self, user: UserId, prompt: &str) -> Result<Reply> {
        let prompt = validate_prompt(prompt)?;

        let handle = self.store.get_or_create(user);
        let mut record = handle.lock().await;

        let ModelSelection::Selected(model) = record.model else {
            debug!("User {user} has no model selected, skipping completion");
            return Ok(Reply::ModelNotSelected);
        };

        record.transcript.push(Message::user(prompt));
        debug!(
            "Transcript for user {user} has {} messages",
            record.transcript.len()
        );

        let request = CompletionRequest::new(model, record.transcript.messages());
        let reply = self.client.complete(&request).await?.into_reply()?;

        record.transcript.push(Message::assistant(reply.clone()));
        Ok(Reply::Text(reply))
    }

    /// Like [`respond`](Self::respond), with an image attached to the prompt.
    ///
    /// Switches the user to the vision model first if needed.
    pub async fn respond_with_image(
        &self,
        user: UserId,
        prompt: &str,
        image_url: &str,
    ) -> Result<ImageReply> {
        let prompt = validate_prompt(prompt)?;
        let image_url = validate_image_url(image_url)?;

        let handle = self.store.get_or_create(user);
        let mut record = handle.lock().await;

        let switched_to = if record.model == ModelSelection::Selected(ModelId::VISION) {
            None
        } else {
            info!(
                "Switching user {user} from {} to {} for image input",
                record.model,
                ModelId::VISION
            );
            record.model = ModelSelection::Selected(ModelId::VISION);
            Some(ModelId::VISION)
        };

        record
            .transcript
            .push(Message::user_with_image(prompt, image_url));

        let request = CompletionRequest::new(ModelId::VISION, record.transcript.messages())
            .with_max_tokens(IMAGE_MAX_TOKENS);
        let text = self.client.complete(&request).await?.into_reply()?;

        record.transcript.push(Message::assistant(text.clone()));
        Ok(ImageReply { text, switched_to })
    }

    pub async fn clear(&self, user: UserId) {
        self.store.clear(user).await;
    }

    pub async fn set_model(&self, user: UserId, model: ModelId) {
        self.store.set_model(user, model).await;
    }

    pub async fn get_model(&self, user: UserId) -> Option<ModelSelection> {
        self.store.get_model(user).await
    }
}

fn validate_prompt(prompt: &str) -> Result<&str> {
    if prompt.trim().is_empty() {
        return Err(BotError::InvalidInput("the message is empty".to_string()));
    }
    Ok(prompt)
}

fn validate_image_url(image_url: &str) -> Result<&str> {
    let image_url = image_url.trim();
    Url::parse(image_url)
        .map_err(|e| BotError::InvalidInput(format!("'{image_url}' is not an image link ({e})")))?;
    Ok(image_url)
}
