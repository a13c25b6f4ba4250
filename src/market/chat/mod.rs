//! 模拟聊天模块
//!
//! 与服务"提供方"的模拟会话：无真实后端，回复为固定话术

pub mod listener;
pub mod session;

// 重新导出主要类型
pub use listener::{ChatListener, EmptyChatListener};
pub use session::{ChatMessage, ChatSession, PROVIDER_SENDER_ID};
