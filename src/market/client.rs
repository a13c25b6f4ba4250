//! 市场客户端统一入口
//!
//! 按配置装配目录客户端、列表控制器、收藏仓库与会话管理器，
//! 认证提供方在创建时一次性选定，之后不再切换

use crate::market::auth::{MockAuthProvider, RemoteAuthProvider, SessionManager};
use crate::market::catalog::{
    CatalogApi, CatalogSource, FeedListener, SearchController, ServiceFeed,
};
use crate::market::chat::{ChatListener, ChatSession};
use crate::market::db::create_sqlite_pool;
use crate::market::favorites::{FavoritesListener, FavoritesRepo};
use crate::market::kv::SqliteKvStore;
use anyhow::{Context, Result};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 默认目录接口地址（dummyjson 风格）
pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";
/// HTTP 请求超时
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 目录接口地址
    pub api_base_url: String,
    /// 本地 SQLite 数据库地址
    pub db_url: String,
    /// true 使用演示账号认证，false 走托管认证服务
    pub use_mock_auth: bool,
    /// 托管认证服务地址（use_mock_auth=false 时使用）
    pub auth_base_url: String,
    /// 托管认证服务的匿名密钥
    pub auth_anon_key: String,
}

impl ClientConfig {
    /// 演示配置：默认目录接口 + 演示账号认证
    pub fn demo(db_url: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            db_url: db_url.into(),
            use_mock_auth: true,
            auth_base_url: String::new(),
            auth_anon_key: String::new(),
        }
    }
}

/// 市场客户端
pub struct MarketClient {
    config: ClientConfig,
    catalog: Arc<CatalogApi>,
    feed: ServiceFeed,
    favorites: FavoritesRepo,
    session: SessionManager,
}

impl MarketClient {
    /// 创建客户端：建库、装配各模块并恢复缓存会话
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let pool = create_sqlite_pool(&config.db_url).await?;
        Self::with_pool(config, pool).await
    }

    /// 使用外部连接池装配（测试注入内存库）
    pub async fn with_pool(config: ClientConfig, pool: Pool<Sqlite>) -> Result<Self> {
        info!(
            "[Client] 初始化市场客户端，目录接口: {}，认证: {}",
            config.api_base_url,
            if config.use_mock_auth {
                "演示账号"
            } else {
                "托管服务"
            }
        );

        SqliteKvStore::init_db_with_connection(&pool).await?;
        let kv = Arc::new(SqliteKvStore::new(pool));

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("创建HTTP客户端失败")?;

        let catalog = Arc::new(CatalogApi::new(http.clone(), config.api_base_url.clone()));
        let feed = ServiceFeed::new(catalog.clone() as Arc<dyn CatalogSource>);
        let favorites = FavoritesRepo::new(kv.clone());

        // 认证提供方二选一，创建后不再切换
        let session = if config.use_mock_auth {
            SessionManager::new(Arc::new(MockAuthProvider::new(kv)))
        } else {
            SessionManager::new(Arc::new(RemoteAuthProvider::new(
                http,
                config.auth_base_url.clone(),
                config.auth_anon_key.clone(),
            )))
        };
        session.init().await?;

        Ok(Self {
            config,
            catalog,
            feed,
            favorites,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 目录数据源（分类列表、服务详情等直连操作）
    pub fn catalog(&self) -> Arc<dyn CatalogSource> {
        self.catalog.clone()
    }

    /// 服务列表控制器
    pub fn feed(&self) -> &ServiceFeed {
        &self.feed
    }

    pub fn set_feed_listener(&mut self, listener: Arc<dyn FeedListener>) {
        self.feed.set_listener(listener);
    }

    /// 收藏仓库
    pub fn favorites(&self) -> &FavoritesRepo {
        &self.favorites
    }

    pub fn set_favorites_listener(&mut self, listener: Arc<dyn FavoritesListener>) {
        self.favorites.set_listener(listener);
    }

    /// 会话管理器
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// 新建搜索控制器；每个搜索页持有自己的实例
    pub fn new_search(&self) -> SearchController {
        SearchController::new(self.catalog.clone() as Arc<dyn CatalogSource>)
    }

    /// 打开某个服务的模拟聊天会话，发送者为当前登录用户
    pub async fn open_chat(&self, service_id: i64, provider_name: &str) -> ChatSession {
        let user_id = self.session.current_user().await.map(|u| u.id);
        ChatSession::new(service_id, provider_name.to_string(), user_id)
    }

    /// 打开模拟聊天会话（带消息回调）
    pub async fn open_chat_with_listener(
        &self,
        service_id: i64,
        provider_name: &str,
        listener: Arc<dyn ChatListener>,
    ) -> ChatSession {
        let user_id = self.session.current_user().await.map(|u| u.id);
        ChatSession::with_listener(service_id, provider_name.to_string(), user_id, listener)
    }

    /// 显式销毁：丢弃内存中的登录态，本地缓存保留
    pub async fn teardown(&self) {
        info!("[Client] 销毁客户端");
        self.session.teardown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::chat::PROVIDER_SENDER_ID;
    use crate::market::test_util::{init_test_logger, memory_pool, sample_service};

    async fn demo_client() -> Result<MarketClient> {
        let pool = memory_pool().await?;
        MarketClient::with_pool(ClientConfig::demo("sqlite::memory:"), pool).await
    }

    #[test]
    fn demo_config_defaults() {
        let config = ClientConfig::demo("sqlite://app.db?mode=rwc");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.use_mock_auth);
    }

    #[tokio::test]
    async fn assembles_with_mock_auth_and_logs_in() -> Result<()> {
        init_test_logger();
        let client = demo_client().await?;
        assert!(!client.session().is_authenticated().await);

        let user = client
            .session()
            .login("demo@famousconnect.com", "demo123")
            .await?;
        assert_eq!(user.id, "demo-1");
        Ok(())
    }

    #[tokio::test]
    async fn favorites_work_through_facade() -> Result<()> {
        let client = demo_client().await?;
        let service = sample_service(7);

        client.favorites().add_favorite(&service).await;
        assert!(client.favorites().is_favorite(7).await);
        assert_eq!(client.favorites().get_favorites().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn chat_sender_is_current_user() -> Result<()> {
        let client = demo_client().await?;
        client
            .session()
            .login("test@example.com", "test123")
            .await?;

        let chat = client
            .open_chat(1, "Premium Car Wash")
            .await
            .with_reply_delay(Duration::from_millis(10));
        chat.send_text("hello").await;

        let messages = chat.messages().await;
        assert_eq!(messages[0].sender_id, "demo-2");
        assert_eq!(messages[1].sender_id, PROVIDER_SENDER_ID);
        Ok(())
    }

    #[tokio::test]
    async fn teardown_drops_login_state() -> Result<()> {
        let client = demo_client().await?;
        client
            .session()
            .login("demo@famousconnect.com", "demo123")
            .await?;

        client.teardown().await;
        assert!(!client.session().is_authenticated().await);
        Ok(())
    }
}
