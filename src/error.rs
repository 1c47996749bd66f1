use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Completion API error ({status}): {message}")]
    CompletionApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Completion response error: {0}")]
    CompletionResponse(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

impl BotError {
    /// True for failures that came from talking to the completion API.
    #[must_use]
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            BotError::CompletionApi { .. } | BotError::CompletionResponse(_) | BotError::Reqwest(_)
        )
    }

    /// Returns a user-friendly error message suitable for displaying in chat
    pub fn user_message(&self) -> String {
        match self {
            BotError::Serenity(_) => {
                "Sorry, I'm having trouble communicating with Discord right now. Please try again later.".to_string()
            }
            BotError::Config(_) | BotError::EnvVar(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
            BotError::CompletionApi { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    "Sorry, I'm having authentication issues with my AI service. Please contact the bot administrator.".to_string()
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    "Sorry, I've hit my usage limit with the AI service. Please try again in a few moments.".to_string()
                }
                StatusCode::NOT_FOUND => {
                    "Sorry, the selected model isn't available right now. Try another one with /model.".to_string()
                }
                status if status.is_server_error() => {
                    "Sorry, the AI service is experiencing issues right now. Please try again later.".to_string()
                }
                status if status.is_client_error() => {
                    "Sorry, there was an issue with my request to the AI service. Please try again or contact the bot administrator.".to_string()
                }
                _ => {
                    "Sorry, I'm having trouble connecting to my AI service. Please try again later.".to_string()
                }
            },
            BotError::CompletionResponse(_) => {
                "Sorry, I received an unexpected response from my AI service. Please try again.".to_string()
            }
            BotError::Reqwest(_) => {
                "Sorry, I'm having network issues. Please try again in a moment.".to_string()
            }
            BotError::InvalidInput(reason) => format!("Sorry, I can't use that: {reason}."),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_failures_are_classified() {
        let api = BotError::CompletionApi {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "quota exceeded".to_string(),
        };
        assert!(api.is_completion_failure());
        assert!(BotError::CompletionResponse("no choices".to_string()).is_completion_failure());
        assert!(!BotError::InvalidInput("empty prompt".to_string()).is_completion_failure());
        assert!(!BotError::Config("bad url".to_string()).is_completion_failure());
    }

    #[test]
    fn quota_errors_get_a_rate_limit_message() {
        let err = BotError::CompletionApi {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "quota exceeded".to_string(),
        };
        assert!(err.user_message().contains("usage limit"));
    }

    #[test]
    fn invalid_input_message_names_the_reason() {
        let err = BotError::InvalidInput("the message is empty".to_string());
        assert_eq!(
            err.user_message(),
            "Sorry, I can't use that: the message is empty."
        );
    }
}
