//! 收藏变更监听器回调接口

use async_trait::async_trait;

/// 收藏集合变更回调接口
#[async_trait]
pub trait FavoritesListener: Send + Sync {
    /// 收藏集合发生变更（添加或移除成功后），参数为收藏列表 JSON 数组字符串
    async fn on_favorites_changed(&self, favorites_json: String);
}

/// 默认空实现（无操作）
pub struct EmptyFavoritesListener;

#[async_trait]
impl FavoritesListener for EmptyFavoritesListener {
    async fn on_favorites_changed(&self, _favorites_json: String) {
        // 默认不做任何处理
    }
}
