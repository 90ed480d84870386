//! # Chat Collaborator
//!
//! Chats are owned by an external messaging backend. The client only needs
//! two operations: resolve (creating if absent) the chat between two users,
//! and delete a chat. A chat is identified by the *unordered* pair of its
//! members, so `get_or_create_chat(a, b)` and `get_or_create_chat(b, a)`
//! resolve to the same chat.

pub mod http;
pub mod memory;

use std::fmt;

use async_trait::async_trait;

pub use http::HttpChatService;
pub use memory::InMemoryChats;

pub type ChatId = String;

/// Canonical key for a two-member chat: members sorted so order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatKey {
    low: String,
    high: String,
}

impl ChatKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                low: a.to_string(),
                high: b.to_string(),
            }
        } else {
            Self {
                low: b.to_string(),
                high: a.to_string(),
            }
        }
    }

    pub fn members(&self) -> [&str; 2] {
        [&self.low, &self.high]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    Network(String),
    Api { status: u16, message: String },
    Parse(String),
    NotFound(ChatId),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(msg) => write!(f, "chat network error: {msg}"),
            ChatError::Api { status, message } => {
                write!(f, "chat backend error (HTTP {status}): {message}")
            }
            ChatError::Parse(msg) => write!(f, "chat parse error: {msg}"),
            ChatError::NotFound(id) => write!(f, "chat {id} not found"),
        }
    }
}

impl std::error::Error for ChatError {}

#[async_trait]
pub trait ChatService: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the chat between `a` and `b`, creating it on first contact.
    async fn get_or_create_chat(&self, a: &str, b: &str) -> Result<ChatId, ChatError>;

    async fn delete_chat(&self, chat_id: &str) -> Result<(), ChatError>;
}
