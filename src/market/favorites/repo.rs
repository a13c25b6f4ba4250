//! 收藏仓库
//!
//! 单键 JSON 数组的全量读改写。收藏集合很小（单设备、单用户、
//! 通常不足百条），按 id 分键或建索引属于过度设计。
//! 变更通过互斥锁串行化：同一时刻只允许一个读改写在途，
//! 并发添加不会互相丢失更新。

use crate::market::favorites::listener::{EmptyFavoritesListener, FavoritesListener};
use crate::market::kv::KeyValueStore;
use crate::market::types::Service;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// 收藏列表的固定存储键
pub const FAVORITES_KEY: &str = "@famous_connect_favorites";

/// 收藏仓库
///
/// 对外的四个操作全部吞掉存储错误：读失败降级为空结果，
/// 写失败静默丢弃，只记录日志，不向调用方抛出。
pub struct FavoritesRepo {
    kv: Arc<dyn KeyValueStore>,
    /// 变更互斥锁：持有期覆盖整个读改写
    write_lock: Mutex<()>,
    listener: Arc<dyn FavoritesListener>,
}

impl FavoritesRepo {
    /// 创建收藏仓库（使用默认空监听器）
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_listener(kv, Arc::new(EmptyFavoritesListener))
    }

    /// 创建收藏仓库（带自定义监听器）
    pub fn with_listener(
        kv: Arc<dyn KeyValueStore>,
        listener: Arc<dyn FavoritesListener>,
    ) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
            listener,
        }
    }

    pub fn set_listener(&mut self, listener: Arc<dyn FavoritesListener>) {
        self.listener = listener;
    }

    /// 获取收藏列表；存储缺失或 JSON 损坏时返回空列表，从不失败
    pub async fn get_favorites(&self) -> Vec<Service> {
        match self.read_or_empty().await {
            Ok(list) => {
                debug!("[Favorites] 读取收藏列表，共 {} 条", list.len());
                list
            }
            Err(e) => {
                error!("[Favorites] 读取收藏失败，按空列表处理: {:?}", e);
                Vec::new()
            }
        }
    }

    /// 添加收藏：按 id 去重，快照原样保存；存储失败时静默丢弃
    pub async fn add_favorite(&self, service: &Service) {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.try_add_favorite(service).await {
            error!("[Favorites] 添加收藏失败 id={}: {:?}", service.id, e);
        }
    }

    /// 移除收藏；id 不存在时为无操作
    pub async fn remove_favorite(&self, service_id: i64) {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.try_remove_favorite(service_id).await {
            error!("[Favorites] 移除收藏失败 id={}: {:?}", service_id, e);
        }
    }

    /// 是否已收藏
    pub async fn is_favorite(&self, service_id: i64) -> bool {
        self.get_favorites()
            .await
            .iter()
            .any(|s| s.id == service_id)
    }

    /// 读取并解析收藏列表
    ///
    /// JSON 损坏时按空列表恢复并记录 error 日志：下一次成功的
    /// 变更会全量重写该键，损坏自愈
    async fn read_or_empty(&self) -> Result<Vec<Service>> {
        let raw = self.kv.get(FAVORITES_KEY).await.context("读取收藏键失败")?;
        let list = match raw {
            Some(json) => match serde_json::from_str::<Vec<Service>>(&json) {
                Ok(list) => list,
                Err(e) => {
                    error!("[Favorites] 收藏 JSON 损坏，按空列表恢复: {:?}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(list)
    }

    async fn try_add_favorite(&self, service: &Service) -> Result<()> {
        let mut current = self.read_or_empty().await?;
        if current.iter().any(|s| s.id == service.id) {
            debug!("[Favorites] id={} 已在收藏中，跳过", service.id);
            return Ok(());
        }
        current.push(service.clone());
        self.write_and_notify(current).await
    }

    async fn try_remove_favorite(&self, service_id: i64) -> Result<()> {
        let mut current = self.read_or_empty().await?;
        let before = current.len();
        current.retain(|s| s.id != service_id);
        if current.len() == before {
            debug!("[Favorites] id={} 不在收藏中，无操作", service_id);
            return Ok(());
        }
        self.write_and_notify(current).await
    }

    /// 全量重写收藏键并触发变更回调
    async fn write_and_notify(&self, list: Vec<Service>) -> Result<()> {
        let json = serde_json::to_string(&list).context("序列化收藏列表失败")?;
        self.kv
            .set(FAVORITES_KEY, &json)
            .await
            .context("写入收藏键失败")?;
        info!("[Favorites] 收藏列表已更新，共 {} 条", list.len());
        self.listener.on_favorites_changed(json).await;
        Ok(())
    }
}
