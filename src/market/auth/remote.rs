//! 托管认证服务透传（supabase 风格接口）

use crate::market::auth::models::User;
use crate::market::auth::provider::AuthProvider;
use crate::market::types::handle_json_response;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    user: Option<RemoteUser>,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

/// 托管认证服务提供方
pub struct RemoteAuthProvider {
    client: reqwest::Client,
    auth_base_url: String,
    anon_key: String,
}

impl RemoteAuthProvider {
    /// `client` 应该已经在外部配置好超时等参数
    pub fn new(client: reqwest::Client, auth_base_url: String, anon_key: String) -> Self {
        Self {
            client,
            auth_base_url,
            anon_key,
        }
    }

    fn to_user(remote: RemoteUser) -> User {
        // name 缺省时回退到邮箱 @ 前的部分
        let name = remote
            .user_metadata
            .get("name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                remote
                    .email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });
        let profile_pic = remote
            .user_metadata
            .get("avatar_url")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        User {
            id: remote.id,
            email: remote.email,
            name,
            profile_pic,
        }
    }
}

#[async_trait]
impl AuthProvider for RemoteAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/auth/v1/token?grant_type=password", self.auth_base_url);

        info!("[RemoteAuth] 🔐 正在登录...");
        debug!("[RemoteAuth]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .context("请求失败")?;

        let token: TokenResponse = handle_json_response(response, "登录").await?;
        debug!(
            "[RemoteAuth] access_token 长度: {}",
            token.access_token.len()
        );
        let user = token
            .user
            .ok_or_else(|| anyhow::anyhow!("响应中缺少 user 字段"))?;

        info!("[RemoteAuth] ✅ 登录成功");
        Ok(Self::to_user(user))
    }

    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/auth/v1/signup", self.auth_base_url);

        info!("[RemoteAuth] 📝 正在注册...");
        debug!("[RemoteAuth]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await
            .context("请求失败")?;

        let token: TokenResponse = handle_json_response(response, "注册").await?;
        let user = token
            .user
            .ok_or_else(|| anyhow::anyhow!("响应中缺少 user 字段"))?;

        info!("[RemoteAuth] ✅ 注册成功");
        Ok(Self::to_user(user))
    }

    async fn logout(&self) -> Result<()> {
        // 托管服务的会话由服务端管理，客户端丢弃本地状态即可
        info!("[RemoteAuth] 已退出登录");
        Ok(())
    }

    async fn restore(&self) -> Result<Option<User>> {
        // 托管模式不在本地缓存会话
        Ok(None)
    }
}
