//! 认证提供方接口

use crate::market::auth::models::User;
use anyhow::Result;
use async_trait::async_trait;

/// 认证提供方策略接口
///
/// 两个实现：内置演示账号与托管认证服务透传，启动时按配置选定一个
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 邮箱密码登录；凭证无效时返回错误
    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// 注册并直接登录
    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<User>;

    /// 退出登录（清理持久化会话）
    async fn logout(&self) -> Result<()>;

    /// 恢复缓存的登录态（应用启动时调用），无缓存返回 None
    async fn restore(&self) -> Result<Option<User>>;
}
