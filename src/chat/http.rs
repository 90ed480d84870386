//! REST chat backend adapter.
//!
//! `POST {base}/chats` with `{"members": [a, b]}` answers `{"chatId": "..."}`
//! for an existing or newly created chat; `DELETE {base}/chats/{id}` removes it.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{ChatError, ChatId, ChatKey, ChatService};

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    members: [&'a str; 2],
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(rename = "chatId")]
    chat_id: ChatId,
}

pub struct HttpChatService {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpChatService {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Chat backend error: {} - {}", status, message);
        Err(ChatError::Api { status, message })
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_or_create_chat(&self, a: &str, b: &str) -> Result<ChatId, ChatError> {
        let key = ChatKey::new(a, b);
        let body = ChatRequest {
            members: key.members(),
        };
        let response = self
            .authorize(self.client.post(format!("{}/chats", self.base_url)))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;
        debug!("Resolved chat {} for {} and {}", chat.chat_id, a, b);
        Ok(chat.chat_id)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<(), ChatError> {
        let response = self
            .authorize(
                self.client
                    .delete(format!("{}/chats/{}", self.base_url, chat_id)),
            )
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ChatError::NotFound(chat_id.to_string()));
        }
        Self::check(response).await?;
        debug!("Deleted chat {}", chat_id);
        Ok(())
    }
}
