//! 服务列表控制器（"全部服务"页）
//!
//! 驱动分页、分类过滤的取数循环：下拉刷新与滚动加载更多。
//! 游标只在取数成功后前进；以"在途页游标 + 代数"抑制同一页的
//! 重复请求，并丢弃切换分类后才到达的过期响应。

use crate::market::catalog::api::{CatalogSource, ALL_CATEGORY};
use crate::market::catalog::listener::{EmptyFeedListener, FeedListener};
use crate::market::types::Service;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// 每页条数
pub const PAGE_SIZE: i64 = 10;

/// 列表状态快照（供 UI 渲染）
#[derive(Debug, Clone)]
pub struct FeedState {
    pub services: Vec<Service>,
    pub selected_category: String,
    /// 下一页游标
    pub skip: i64,
    /// 服务器报告的总条数
    pub total: i64,
    pub loading: bool,
    pub refreshing: bool,
    pub loading_more: bool,
}

/// 内部状态
#[derive(Debug)]
struct FeedInner {
    services: Vec<Service>,
    selected_category: String,
    skip: i64,
    total: i64,
    loading: bool,
    refreshing: bool,
    loading_more: bool,
    /// 在途请求的页游标；Some 表示有请求在途
    in_flight_skip: Option<i64>,
    /// 代数：切换分类时递增，使在途的旧响应失效
    epoch: u64,
}

/// 服务列表控制器
pub struct ServiceFeed {
    source: Arc<dyn CatalogSource>,
    state: Mutex<FeedInner>,
    listener: Arc<dyn FeedListener>,
}

impl ServiceFeed {
    /// 创建列表控制器（使用默认空监听器）
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_listener(source, Arc::new(EmptyFeedListener))
    }

    /// 创建列表控制器（带自定义监听器）
    pub fn with_listener(
        source: Arc<dyn CatalogSource>,
        listener: Arc<dyn FeedListener>,
    ) -> Self {
        Self {
            source,
            state: Mutex::new(FeedInner {
                services: Vec::new(),
                selected_category: ALL_CATEGORY.to_string(),
                skip: 0,
                total: 0,
                loading: false,
                refreshing: false,
                loading_more: false,
                in_flight_skip: None,
                epoch: 0,
            }),
            listener,
        }
    }

    pub fn set_listener(&mut self, listener: Arc<dyn FeedListener>) {
        self.listener = listener;
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> FeedState {
        let s = self.state.lock().await;
        FeedState {
            services: s.services.clone(),
            selected_category: s.selected_category.clone(),
            skip: s.skip,
            total: s.total,
            loading: s.loading,
            refreshing: s.refreshing,
            loading_more: s.loading_more,
        }
    }

    /// 切换分类：清空累积结果、游标归零，按新分类重新取第一页
    ///
    /// 在途的旧请求不取消，其响应到达后因代数不符被丢弃
    pub async fn set_category(&self, category: &str) {
        {
            let mut s = self.state.lock().await;
            info!(
                "[Feed] 切换分类: {} -> {}",
                s.selected_category, category
            );
            s.selected_category = category.to_string();
            s.services.clear();
            s.skip = 0;
            s.total = 0;
            s.in_flight_skip = None;
            s.epoch = s.epoch.wrapping_add(1);
        }
        self.fetch(0, true).await;
    }

    /// 下拉刷新：回到第一页并整体替换累积结果
    pub async fn refresh(&self) {
        self.fetch(0, true).await;
    }

    /// 加载更多：有请求在途或累积条数已达 total 时为无操作
    pub async fn load_more(&self) {
        let current_skip = {
            let s = self.state.lock().await;
            if s.in_flight_skip.is_some() {
                debug!("[Feed] 已有请求在途，忽略 load_more");
                return;
            }
            if (s.services.len() as i64) >= s.total {
                debug!(
                    "[Feed] 已全部加载（{}/{}），忽略 load_more",
                    s.services.len(),
                    s.total
                );
                return;
            }
            s.skip
        };
        self.fetch(current_skip, false).await;
    }

    /// 执行一次取数；replace=true 时整体替换累积结果
    ///
    /// 失败不污染已累积的结果，只记录日志并清理在途标志
    async fn fetch(&self, current_skip: i64, replace: bool) {
        let (category, epoch) = {
            let mut s = self.state.lock().await;
            if let Some(in_flight) = s.in_flight_skip {
                debug!(
                    "[Feed] skip={} 已有请求在途，抑制本次取数（请求页 skip={}）",
                    in_flight, current_skip
                );
                return;
            }
            s.in_flight_skip = Some(current_skip);
            if replace {
                if s.services.is_empty() {
                    s.loading = true;
                } else {
                    s.refreshing = true;
                }
            } else {
                s.loading_more = true;
            }
            (s.selected_category.clone(), s.epoch)
        };

        info!(
            "[Feed] 📡 取数 skip={}, 分类: {}, 替换: {}",
            current_skip, category, replace
        );
        let result = self
            .source
            .get_products(PAGE_SIZE, current_skip, None, Some(&category))
            .await;

        let mut s = self.state.lock().await;
        // 分类已切换：本响应过期，不触碰新状态
        if s.epoch != epoch || s.in_flight_skip != Some(current_skip) {
            debug!("[Feed] skip={} 的响应已过期，丢弃", current_skip);
            return;
        }
        s.in_flight_skip = None;
        s.loading = false;
        s.refreshing = false;
        s.loading_more = false;

        match result {
            Ok(page) => {
                if replace {
                    s.services = page.products;
                } else {
                    s.services.extend(page.products);
                }
                s.total = page.total;
                // 游标只在成功后前进
                s.skip = current_skip + PAGE_SIZE;
                info!(
                    "[Feed] ✅ 取数成功，累积 {} 条 / 总数 {}，下一页 skip={}",
                    s.services.len(),
                    s.total,
                    s.skip
                );
                let payload = serde_json::to_string(&s.services).ok();
                drop(s);
                if let Some(json) = payload {
                    self.listener.on_feed_changed(json).await;
                }
            }
            Err(e) => {
                error!("[Feed] 取数失败 skip={}: {:?}", current_skip, e);
            }
        }
    }
}
