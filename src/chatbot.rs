//! AI chatbot module - mediates between chat users and the completion API.

mod handler;
mod inbound;
mod mediator;
mod response;

pub use handler::handle_message;
pub(crate) use handler::model_prompt;
pub use inbound::{ChatKind, InboundMessage};
pub use mediator::{ChatMediator, IMAGE_MAX_TOKENS, ImageReply, MODEL_NOT_SELECTED, Reply};
pub use response::{DISCORD_MESSAGE_LIMIT, split_message};
