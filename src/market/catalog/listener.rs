//! 服务列表监听器回调接口

use async_trait::async_trait;

/// 服务列表变更回调接口
#[async_trait]
pub trait FeedListener: Send + Sync {
    /// 累积列表发生变更（刷新或加载更多成功后），参数为服务列表 JSON 数组字符串
    async fn on_feed_changed(&self, services_json: String);
}

/// 默认空实现（无操作）
pub struct EmptyFeedListener;

#[async_trait]
impl FeedListener for EmptyFeedListener {
    async fn on_feed_changed(&self, _services_json: String) {
        // 默认不做任何处理
    }
}
