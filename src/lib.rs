pub mod bot;
pub mod chatbot;
pub mod commands;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod media;
pub mod types;

pub use bot::run;
