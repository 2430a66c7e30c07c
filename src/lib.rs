//! bible-chat: a Bible-grounded conversational assistant
//!
//! The pipeline: detect the language of a message, resolve a Bible
//! translation, retrieve relevant verses and passages by embedding
//! similarity, and generate an answer that may only cite what retrieval
//! provided.

pub mod chat;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod language;
pub mod locale;
pub mod models;
pub mod providers;
pub mod search;
pub mod store;

pub use error::{Error, Result};
