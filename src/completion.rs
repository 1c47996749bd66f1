//! Chat-completion API types and the HTTP client that talks to it.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, Result};
use crate::types::{MessageRole, ModelId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    MultiPart(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl MessageContent {
    /// Flattens the content into plain text, dropping non-text parts.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::MultiPart(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying text first, then an image reference.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::MultiPart(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }
}

/// Request body for a chat completion.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    #[serde(serialize_with = "serialize_model")]
    pub model: ModelId,
    pub messages: &'a [Message],
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn serialize_model<S: serde::Serializer>(
    model: &ModelId,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(model.as_str())
}

impl<'a> CompletionRequest<'a> {
    /// Deterministic request over the full transcript.
    #[must_use]
    pub fn new(model: ModelId, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl CompletionResponse {
    /// Single-choice response holding `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    role: MessageRole::Assistant,
                    content: Some(MessageContent::Text(text.into())),
                },
            }],
        }
    }

    /// Extracts the reply text of the first choice.
    pub fn into_reply(self) -> Result<String> {
        let message = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::CompletionResponse("No choices in response".to_string()))?
            .message;

        let reply = message
            .content
            .map(|content| content.to_text())
            .ok_or_else(|| BotError::CompletionResponse("First choice has no content".to_string()))?;

        if reply.trim().is_empty() {
            return Err(BotError::CompletionResponse(
                "First choice has blank content".to_string(),
            ));
        }
        Ok(reply)
    }
}

/// External chat-completion service.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<CompletionResponse>;
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    api_key: String,
    api_url: Url,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            api_url,
            client,
        })
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<CompletionResponse> {
        debug!(
            "Sending request to completion API with {} messages (model: {})",
            request.messages.len(),
            request.model
        );

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::CompletionApi { status, message });
        }

        let api_response: CompletionResponse = response.json().await?;
        debug!(
            "Received response from completion API with {} choices",
            api_response.choices.len()
        );
        Ok(api_response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_serializes_as_chat_completion_body() {
        let messages = vec![Message::system("You are a helpful assistant."), Message::user("hi")];
        let request = CompletionRequest::new(ModelId::Gpt35Turbo, &messages);

        let body = serde_json::to_value(&request).expect("serializable");
        assert_eq!(
            body,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn image_request_carries_parts_and_token_cap() {
        let messages = vec![Message::user_with_image(
            "what is this?",
            "https://cdn.example.com/cat.png",
        )];
        let request = CompletionRequest::new(ModelId::VISION, &messages).with_max_tokens(400);

        let body = serde_json::to_value(&request).expect("serializable");
        assert_eq!(body["model"], "gpt-4-vision-preview");
        assert_eq!(body["max_tokens"], 400);
        assert_eq!(
            body["messages"][0]["content"],
            json!([
                {"type": "text", "text": "what is this?"},
                {"type": "image_url", "image_url": {"url": "https://cdn.example.com/cat.png"}}
            ])
        );
    }

    #[test]
    fn reply_is_taken_from_first_choice() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .expect("deserializable");

        assert_eq!(response.into_reply().expect("reply"), "first");
    }

    #[test]
    fn empty_choices_is_a_response_error() {
        let response = CompletionResponse { choices: vec![] };
        assert!(matches!(
            response.into_reply(),
            Err(BotError::CompletionResponse(_))
        ));
    }

    #[test]
    fn blank_content_is_a_response_error() {
        for text in ["", "  \n "] {
            assert!(matches!(
                CompletionResponse::from_text(text).into_reply(),
                Err(BotError::CompletionResponse(_))
            ));
        }
    }

    #[test]
    fn null_content_is_a_response_error() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .expect("deserializable");

        assert!(matches!(
            response.into_reply(),
            Err(BotError::CompletionResponse(_))
        ));
    }
}
