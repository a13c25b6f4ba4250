//! 模拟服务方聊天会话
//!
//! 打开即收到服务方问候语；发送消息后延迟固定时长收到
//! 固定话术的回复。消息按最新在前排列。

use crate::market::chat::listener::{ChatListener, EmptyChatListener};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 模拟服务方回复延迟
pub const PROVIDER_REPLY_DELAY: Duration = Duration::from_millis(1500);
/// 模拟服务方的发送者 ID
pub const PROVIDER_SENDER_ID: &str = "provider";
/// 未登录用户的发送者 ID
pub const GUEST_SENDER_ID: &str = "guest";

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub created_at: String,
}

impl ChatMessage {
    fn now(text: String, sender_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            text,
            sender_id,
            created_at: now.to_rfc3339(),
        }
    }
}

/// 单个服务的聊天会话
pub struct ChatSession {
    service_id: i64,
    provider_name: String,
    user_id: String,
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    listener: Arc<dyn ChatListener>,
    reply_delay: Duration,
}

impl ChatSession {
    /// 打开会话（使用默认空监听器）
    pub fn new(service_id: i64, provider_name: String, user_id: Option<String>) -> Self {
        Self::with_listener(
            service_id,
            provider_name,
            user_id,
            Arc::new(EmptyChatListener),
        )
    }

    /// 打开会话（带自定义监听器），首条消息为服务方问候语
    pub fn with_listener(
        service_id: i64,
        provider_name: String,
        user_id: Option<String>,
        listener: Arc<dyn ChatListener>,
    ) -> Self {
        let greeting = ChatMessage::now(
            format!("Hi! How can I help you with {}?", provider_name),
            PROVIDER_SENDER_ID.to_string(),
        );
        info!(
            "[Chat] 打开会话 service_id={}, 服务方: {}",
            service_id, provider_name
        );
        Self {
            service_id,
            provider_name,
            user_id: user_id.unwrap_or_else(|| GUEST_SENDER_ID.to_string()),
            messages: Arc::new(Mutex::new(vec![greeting])),
            listener,
            reply_delay: PROVIDER_REPLY_DELAY,
        }
    }

    /// 自定义回复延迟（测试用）
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn service_id(&self) -> i64 {
        self.service_id
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// 消息快照（最新在前）
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    /// 发送文本消息；空白内容忽略
    ///
    /// 入列本人消息后调度模拟服务方的延迟回复
    pub async fn send_text(&self, text: &str) {
        if text.trim().is_empty() {
            debug!("[Chat] 忽略空白消息");
            return;
        }

        let message = ChatMessage::now(text.to_string(), self.user_id.clone());
        {
            let mut msgs = self.messages.lock().await;
            msgs.insert(0, message.clone());
        }
        if let Ok(json) = serde_json::to_string(&message) {
            self.listener.on_new_message(json).await;
        }

        // 模拟服务方延迟回复
        let messages = Arc::clone(&self.messages);
        let listener = Arc::clone(&self.listener);
        let delay = self.reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = ChatMessage::now(
                "I'll get back to you shortly!".to_string(),
                PROVIDER_SENDER_ID.to_string(),
            );
            messages.lock().await.insert(0, reply.clone());
            if let Ok(json) = serde_json::to_string(&reply) {
                listener.on_new_message(json).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::test_util::init_test_logger;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    #[tokio::test]
    async fn opens_with_provider_greeting() {
        init_test_logger();
        let chat = ChatSession::new(1, "Premium Car Wash".to_string(), None);

        let messages = chat.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_id, PROVIDER_SENDER_ID);
        assert!(messages[0].text.contains("Premium Car Wash"));
    }

    #[tokio::test]
    async fn send_appends_user_message_then_mock_reply() {
        let chat = ChatSession::new(1, "Car Wash".to_string(), Some("demo-1".to_string()))
            .with_reply_delay(Duration::from_millis(10));

        chat.send_text("Hello, is this available?").await;

        // 发送后立即可见本人消息（最新在前）
        let messages = chat.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender_id, "demo-1");
        assert_eq!(messages[0].text, "Hello, is this available?");

        // 延迟后收到模拟服务方回复
        sleep(Duration::from_millis(100)).await;
        let messages = chat.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].sender_id, PROVIDER_SENDER_ID);
        assert_eq!(messages[0].text, "I'll get back to you shortly!");
    }

    #[tokio::test]
    async fn blank_message_is_ignored() {
        let chat = ChatSession::new(1, "Car Wash".to_string(), None)
            .with_reply_delay(Duration::from_millis(10));

        chat.send_text("   ").await;
        sleep(Duration::from_millis(50)).await;

        // 只有问候语，没有新消息也没有回复
        assert_eq!(chat.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn listener_fires_for_both_directions() {
        struct CountingListener(AtomicUsize);

        #[async_trait]
        impl ChatListener for CountingListener {
            async fn on_new_message(&self, _message_json: String) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let listener = Arc::new(CountingListener(AtomicUsize::new(0)));
        let chat = ChatSession::with_listener(
            1,
            "Car Wash".to_string(),
            Some("demo-1".to_string()),
            listener.clone(),
        )
        .with_reply_delay(Duration::from_millis(10));

        chat.send_text("Hi").await;
        sleep(Duration::from_millis(100)).await;

        // 本人消息 + 服务方回复各一次
        assert_eq!(listener.0.load(Ordering::SeqCst), 2);
    }
}
