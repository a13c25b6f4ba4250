//! 搜索控制器（防抖单次取数）
//!
//! 每次键入重置静默期，期满后发起一次取数并整体替换结果集。
//! 不做请求取消：以代数计数在静默期满与应用结果两处校验，
//! 抑制过期请求与乱序响应。

use crate::market::catalog::api::CatalogSource;
use crate::market::types::Service;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 防抖静默期
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// 搜索页单次取数条数（无分页累积）
pub const SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Default)]
struct SearchInner {
    query: String,
    results: Vec<Service>,
    loading: bool,
    /// 代数：每次键入递增，旧的防抖任务与响应据此失效
    generation: u64,
}

/// 搜索控制器
pub struct SearchController {
    source: Arc<dyn CatalogSource>,
    state: Arc<Mutex<SearchInner>>,
    debounce: Duration,
}

impl SearchController {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_debounce(source, SEARCH_DEBOUNCE)
    }

    /// 自定义防抖时长（测试用短静默期）
    pub fn with_debounce(source: Arc<dyn CatalogSource>, debounce: Duration) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(SearchInner::default())),
            debounce,
        }
    }

    /// 当前结果快照
    pub async fn results(&self) -> Vec<Service> {
        self.state.lock().await.results.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query.clone()
    }

    /// 键入新搜索词
    ///
    /// 空白词直接清空结果、不发请求；否则在静默期满后取数，
    /// 静默期内的后续键入会使本次取数作废
    pub async fn set_query(&self, query: &str) {
        let generation = {
            let mut s = self.state.lock().await;
            s.generation = s.generation.wrapping_add(1);
            s.query = query.to_string();
            if query.trim().is_empty() {
                s.results.clear();
                s.loading = false;
                debug!("[Search] 清空搜索词与结果");
                return;
            }
            s.generation
        };

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;
        let query = query.to_string();

        tokio::spawn(async move {
            sleep(debounce).await;

            {
                let mut s = state.lock().await;
                // 静默期内有新键入则放弃本次请求
                if s.generation != generation {
                    debug!("[Search] 防抖期间搜索词已变化，放弃请求: {}", query);
                    return;
                }
                s.loading = true;
            }

            info!("[Search] 🔍 发起搜索: {}", query);
            let result = source.get_products(SEARCH_LIMIT, 0, Some(&query), None).await;

            let mut s = state.lock().await;
            if s.generation != generation {
                debug!("[Search] 响应已过期，丢弃: {}", query);
                return;
            }
            s.loading = false;
            match result {
                Ok(page) => {
                    info!(
                        "[Search] ✅ 搜索完成: {}，结果 {} 条",
                        query,
                        page.products.len()
                    );
                    // 每次取数整体替换结果集
                    s.results = page.products;
                }
                Err(e) => {
                    error!("[Search] 搜索失败: {}: {:?}", query, e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::catalog::api::CatalogSource;
    use crate::market::test_util::{init_test_logger, sample_service};
    use crate::market::types::ProductsPage;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按搜索词返回带标记结果的计数数据源
    struct MockSearchSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for MockSearchSource {
        async fn get_products(
            &self,
            _limit: i64,
            _skip: i64,
            query: Option<&str>,
            _category: Option<&str>,
        ) -> Result<ProductsPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut svc = sample_service(1);
            svc.title = query.unwrap_or_default().to_string();
            Ok(ProductsPage {
                products: vec![svc],
                total: 1,
                skip: 0,
                limit: SEARCH_LIMIT,
            })
        }

        async fn get_categories(&self) -> Result<Vec<String>> {
            Ok(vec!["All".to_string()])
        }

        async fn get_product_by_id(&self, id: i64) -> Result<crate::market::types::Service> {
            Ok(sample_service(id))
        }
    }

    #[tokio::test]
    async fn rapid_queries_issue_single_request_for_last() {
        init_test_logger();
        let source = Arc::new(MockSearchSource {
            calls: AtomicUsize::new(0),
        });
        let search = SearchController::with_debounce(source.clone(), Duration::from_millis(50));

        // 静默期内连续键入，只有最后一次会发请求
        search.set_query("c").await;
        search.set_query("ca").await;
        search.set_query("car").await;

        sleep(Duration::from_millis(200)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        let results = search.results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "car");
        assert!(!search.is_loading().await);
    }

    #[tokio::test]
    async fn empty_query_clears_results_without_request() {
        let source = Arc::new(MockSearchSource {
            calls: AtomicUsize::new(0),
        });
        let search = SearchController::with_debounce(source.clone(), Duration::from_millis(50));

        search.set_query("phone").await;
        sleep(Duration::from_millis(150)).await;
        assert_eq!(search.results().await.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        search.set_query("  ").await;
        sleep(Duration::from_millis(150)).await;
        assert!(search.results().await.is_empty());
        // 清空不触发请求
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn new_query_replaces_previous_results() {
        let source = Arc::new(MockSearchSource {
            calls: AtomicUsize::new(0),
        });
        let search = SearchController::with_debounce(source.clone(), Duration::from_millis(20));

        search.set_query("laptop").await;
        sleep(Duration::from_millis(100)).await;
        assert_eq!(search.results().await[0].title, "laptop");

        search.set_query("phone").await;
        sleep(Duration::from_millis(100)).await;
        let results = search.results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "phone");
    }
}
