//! 会话管理器
//!
//! 显式创建、显式 init/teardown 的登录态容器，
//! 取代环境式的全局会话查找

use crate::market::auth::models::User;
use crate::market::auth::provider::AuthProvider;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// 会话管理器：持有当前登录用户，认证操作委托给注入的提供方
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    current: Mutex<Option<User>>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            current: Mutex::new(None),
        }
    }

    /// 启动时恢复缓存的登录态
    pub async fn init(&self) -> Result<()> {
        if let Some(user) = self.provider.restore().await? {
            info!("[Session] 恢复缓存会话: {}", user.email);
            *self.current.lock().await = Some(user);
        }
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.provider.login(email, password).await?;
        *self.current.lock().await = Some(user.clone());
        Ok(user)
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let user = self.provider.signup(email, password, name).await?;
        *self.current.lock().await = Some(user.clone());
        Ok(user)
    }

    /// 退出登录并清理持久化会话
    pub async fn logout(&self) -> Result<()> {
        self.provider.logout().await?;
        *self.current.lock().await = None;
        info!("[Session] 已清除登录态");
        Ok(())
    }

    /// 显式销毁：只丢弃内存中的登录态，不触碰持久化缓存
    pub async fn teardown(&self) {
        *self.current.lock().await = None;
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::auth::mock::MockAuthProvider;
    use crate::market::auth::models::MOCK_USER_KEY;
    use crate::market::kv::{KeyValueStore, SqliteKvStore};
    use crate::market::test_util::{init_test_logger, memory_pool};

    async fn new_kv() -> Arc<SqliteKvStore> {
        Arc::new(SqliteKvStore::new(memory_pool().await.unwrap()))
    }

    #[tokio::test]
    async fn demo_login_and_restore_across_restart() -> Result<()> {
        init_test_logger();
        let kv = new_kv().await;

        let session = SessionManager::new(Arc::new(MockAuthProvider::new(kv.clone())));
        session.init().await?;
        assert!(!session.is_authenticated().await);

        // 邮箱大小写不敏感
        let user = session.login("Demo@FamousConnect.com", "demo123").await?;
        assert_eq!(user.id, "demo-1");
        assert_eq!(user.name, "Demo User");
        assert!(session.is_authenticated().await);

        // 模拟应用重启：新的会话管理器从缓存恢复登录态
        let session2 = SessionManager::new(Arc::new(MockAuthProvider::new(kv.clone())));
        session2.init().await?;
        assert_eq!(session2.current_user().await.map(|u| u.id), Some("demo-1".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let kv = new_kv().await;
        let session = SessionManager::new(Arc::new(MockAuthProvider::new(kv)));

        let result = session.login("demo@famousconnect.com", "wrong").await;
        assert!(result.is_err());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_cache() -> Result<()> {
        let kv = new_kv().await;
        let session = SessionManager::new(Arc::new(MockAuthProvider::new(kv.clone())));

        session.login("test@example.com", "test123").await?;
        assert!(kv.get(MOCK_USER_KEY).await?.is_some());

        session.logout().await?;
        assert!(!session.is_authenticated().await);
        assert!(kv.get(MOCK_USER_KEY).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn signup_creates_mock_user_and_logs_in() -> Result<()> {
        let kv = new_kv().await;
        let session = SessionManager::new(Arc::new(MockAuthProvider::new(kv)));

        let user = session
            .signup("new@example.com", "secret", "New User")
            .await?;
        assert!(user.id.starts_with("mock-"));
        assert_eq!(user.name, "New User");
        assert!(session.is_authenticated().await);
        Ok(())
    }

    #[tokio::test]
    async fn teardown_keeps_persisted_session() -> Result<()> {
        let kv = new_kv().await;
        let session = SessionManager::new(Arc::new(MockAuthProvider::new(kv.clone())));

        session.login("john@example.com", "john123").await?;
        session.teardown().await;

        assert!(!session.is_authenticated().await);
        // teardown 不清缓存，下次 init 仍可恢复
        assert!(kv.get(MOCK_USER_KEY).await?.is_some());
        Ok(())
    }
}
