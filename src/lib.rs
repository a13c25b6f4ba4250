//! Famous Connect 市场客户端 SDK
//!
//! 移动端市场应用的数据访问层：远端目录取数（分页、分类过滤、
//! 防抖搜索）、本地收藏、认证会话与模拟服务方聊天。

pub mod market;

// 顶层重新导出常用类型
pub use market::auth::{AuthProvider, MockAuthProvider, RemoteAuthProvider, SessionManager, User};
pub use market::catalog::{
    CatalogApi, CatalogSource, FeedListener, FeedState, SearchController, ServiceFeed,
    ALL_CATEGORY, PAGE_SIZE,
};
pub use market::chat::{ChatListener, ChatMessage, ChatSession, PROVIDER_SENDER_ID};
pub use market::client::{ClientConfig, MarketClient, DEFAULT_API_BASE_URL};
pub use market::favorites::{FavoritesListener, FavoritesRepo};
pub use market::types::{ProductsPage, Service};
