//! Process-local chat backend, used when no chat service is configured.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use super::{ChatError, ChatId, ChatKey, ChatService};

#[derive(Default)]
pub struct InMemoryChats {
    chats: Mutex<HashMap<ChatKey, ChatId>>,
}

impl InMemoryChats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chats.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.chats
            .lock()
            .map(|c| c.contains_key(&ChatKey::new(a, b)))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ChatService for InMemoryChats {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_or_create_chat(&self, a: &str, b: &str) -> Result<ChatId, ChatError> {
        let mut chats = self
            .chats
            .lock()
            .map_err(|_| ChatError::Network("chat store poisoned".to_string()))?;
        let id = chats
            .entry(ChatKey::new(a, b))
            .or_insert_with(|| {
                let id = uuid::Uuid::new_v4().to_string();
                debug!("Created chat {} for {} and {}", id, a, b);
                id
            })
            .clone();
        Ok(id)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<(), ChatError> {
        let mut chats = self
            .chats
            .lock()
            .map_err(|_| ChatError::Network("chat store poisoned".to_string()))?;
        let before = chats.len();
        chats.retain(|_, id| id != chat_id);
        if chats.len() == before {
            return Err(ChatError::NotFound(chat_id.to_string()));
        }
        debug!("Deleted chat {}", chat_id);
        Ok(())
    }
}
