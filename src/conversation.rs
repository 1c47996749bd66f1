//! Per-user conversation state: transcripts and model selection.

mod record;
mod store;

pub use record::{ConversationRecord, SYSTEM_PROMPT, Transcript};
pub use store::{ConversationStore, RecordHandle};
