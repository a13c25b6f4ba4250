//! 商品目录模块
//!
//! 远端目录 HTTP 客户端、服务列表控制器与防抖搜索

pub mod api;
pub mod feed;
pub mod listener;
pub mod search;

// 重新导出主要类型
pub use api::{CatalogApi, CatalogSource, ALL_CATEGORY};
pub use feed::{FeedState, ServiceFeed, PAGE_SIZE};
pub use listener::{EmptyFeedListener, FeedListener};
pub use search::SearchController;
