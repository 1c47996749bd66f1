//! Common types used throughout the relaygpt bot.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// Platform account identifier.
///
/// Opaque to the core; the transport maps its own user ids into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(u64);

impl UserId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a message in the conversation.
///
/// Maps to chat-completion API message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt or instructions
    System,
    /// Message from the human user
    User,
    /// Message from the AI assistant
    Assistant,
}

/// Completion models a user can pick from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    Display,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ModelId {
    /// Fast text model
    #[strum(serialize = "gpt-3.5-turbo")]
    Gpt35Turbo,
    /// Higher-capability text model
    #[strum(serialize = "gpt-4")]
    Gpt4,
    /// Vision-capable model, forced for image messages
    #[strum(serialize = "gpt-4-vision-preview")]
    Gpt4Vision,
}

impl ModelId {
    /// The model used whenever a message carries an image.
    pub const VISION: ModelId = ModelId::Gpt4Vision;

    /// Name sent to the completion API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Per-user model state. Starts `Unselected` and never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelSelection {
    #[default]
    Unselected,
    Selected(ModelId),
}

impl ModelSelection {
    #[must_use]
    pub fn model(self) -> Option<ModelId> {
        match self {
            ModelSelection::Unselected => None,
            ModelSelection::Selected(model) => Some(model),
        }
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSelection::Unselected => f.write_str("none"),
            ModelSelection::Selected(model) => write!(f, "{model}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn model_names_parse_case_insensitively() {
        assert_eq!(ModelId::from_str("gpt-4"), Ok(ModelId::Gpt4));
        assert_eq!(ModelId::from_str("GPT-3.5-Turbo"), Ok(ModelId::Gpt35Turbo));
        assert!(ModelId::from_str("gpt-5000").is_err());
    }

    #[test]
    fn variant_names_match_api_names() {
        assert_eq!(
            ModelId::VARIANTS,
            &["gpt-3.5-turbo", "gpt-4", "gpt-4-vision-preview"]
        );
        assert_eq!(ModelId::VISION.as_str(), "gpt-4-vision-preview");
    }

    #[test]
    fn selection_displays_none_until_chosen() {
        assert_eq!(ModelSelection::default().to_string(), "none");
        assert_eq!(ModelSelection::Selected(ModelId::Gpt4).to_string(), "gpt-4");
        assert_eq!(ModelSelection::Unselected.model(), None);
    }
}
