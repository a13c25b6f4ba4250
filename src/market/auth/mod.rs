//! 认证与会话模块
//!
//! 认证提供方二选一（演示账号 / 托管认证服务），启动时按配置选定；
//! 登录态由显式创建的会话管理器持有

pub mod mock;
pub mod models;
pub mod provider;
pub mod remote;
pub mod session;

// 重新导出主要类型
pub use mock::MockAuthProvider;
pub use models::{User, MOCK_USER_KEY};
pub use provider::AuthProvider;
pub use remote::RemoteAuthProvider;
pub use session::SessionManager;
