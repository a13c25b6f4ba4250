//! 演示账号认证（无需远端服务）

use crate::market::auth::models::{User, DEMO_ACCOUNTS, MOCK_USER_KEY};
use crate::market::auth::provider::AuthProvider;
use crate::market::kv::KeyValueStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// 演示账号认证提供方
///
/// 登录只校验内置账号表，会话以 JSON 块缓存在本地键值存储中
pub struct MockAuthProvider {
    kv: Arc<dyn KeyValueStore>,
}

impl MockAuthProvider {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn persist(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).context("序列化会话失败")?;
        self.kv
            .set(MOCK_USER_KEY, &json)
            .await
            .context("写入会话缓存失败")
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        // 邮箱大小写不敏感，密码精确匹配
        let account = DEMO_ACCOUNTS
            .iter()
            .find(|acc| acc.email.eq_ignore_ascii_case(email) && acc.password == password);

        match account {
            Some(acc) => {
                let user = User {
                    id: acc.id.to_string(),
                    email: acc.email.to_string(),
                    name: acc.name.to_string(),
                    profile_pic: None,
                };
                self.persist(&user).await?;
                info!("[MockAuth] ✅ 演示账号登录成功: {}", user.email);
                Ok(user)
            }
            None => {
                warn!("[MockAuth] 登录失败，邮箱或密码错误: {}", email);
                Err(anyhow::anyhow!("Invalid email or password"))
            }
        }
    }

    async fn signup(&self, email: &str, _password: &str, name: &str) -> Result<User> {
        let user = User {
            id: format!("mock-{}", chrono::Utc::now().timestamp_millis()),
            email: email.to_string(),
            name: name.to_string(),
            profile_pic: None,
        };
        self.persist(&user).await?;
        info!("[MockAuth] ✅ 演示账号注册成功: {}", user.email);
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        self.kv
            .remove(MOCK_USER_KEY)
            .await
            .context("清除会话缓存失败")?;
        info!("[MockAuth] 已退出登录");
        Ok(())
    }

    async fn restore(&self) -> Result<Option<User>> {
        let raw = self
            .kv
            .get(MOCK_USER_KEY)
            .await
            .context("读取会话缓存失败")?;
        Ok(match raw {
            Some(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("[MockAuth] 会话缓存损坏，按未登录处理: {:?}", e);
                    None
                }
            },
            None => None,
        })
    }
}
