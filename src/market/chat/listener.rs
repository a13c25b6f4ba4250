//! 聊天消息监听器回调接口

use async_trait::async_trait;

/// 聊天消息回调接口
#[async_trait]
pub trait ChatListener: Send + Sync {
    /// 收到新消息（本人发送或模拟服务方回复），参数为消息 JSON 字符串
    async fn on_new_message(&self, message_json: String);
}

/// 默认空实现（无操作）
pub struct EmptyChatListener;

#[async_trait]
impl ChatListener for EmptyChatListener {
    async fn on_new_message(&self, _message_json: String) {
        // 默认不做任何处理
    }
}
