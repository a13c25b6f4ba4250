//! 远端目录 HTTP API 客户端
//!
//! 负责所有商品目录相关的 HTTP 请求（dummyjson 风格接口）

use crate::market::types::{handle_json_response, ProductsPage, Service};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

/// 全部分类的哨兵值，选中时视为不过滤
pub const ALL_CATEGORY: &str = "All";

/// 目录数据源接口
///
/// 列表控制器与搜索控制器只依赖此接口取数，便于测试替换
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// 分页获取服务列表
    ///
    /// 过滤优先级：搜索词 > 分类 > 无过滤分页；分类为哨兵 "All" 时不过滤
    async fn get_products(
        &self,
        limit: i64,
        skip: i64,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<ProductsPage>;

    /// 获取分类列表（已在开头插入哨兵 "All"）
    async fn get_categories(&self) -> Result<Vec<String>>;

    /// 按 id 获取单个服务
    async fn get_product_by_id(&self, id: i64) -> Result<Service>;
}

/// 目录 API 客户端
pub struct CatalogApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl CatalogApi {
    /// 创建新的目录 API 客户端
    ///
    /// `client` 应该已经在外部配置好超时等参数
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }
}

#[async_trait]
impl CatalogSource for CatalogApi {
    async fn get_products(
        &self,
        limit: i64,
        skip: i64,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<ProductsPage> {
        let operation_id = Uuid::new_v4().to_string();

        // 过滤优先级：搜索词 > 分类 > 无过滤分页
        let url = if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            format!(
                "{}/products/search?q={}&limit={}&skip={}",
                self.api_base_url, q, limit, skip
            )
        } else if let Some(c) = category.filter(|c| !c.is_empty() && *c != ALL_CATEGORY) {
            // 分类作为路径段使用小写形式
            format!(
                "{}/products/category/{}?limit={}&skip={}",
                self.api_base_url,
                c.to_lowercase(),
                limit,
                skip
            )
        } else {
            format!("{}/products?limit={}&skip={}", self.api_base_url, limit, skip)
        };

        info!("[CatalogAPI] 📡 请求服务列表");
        debug!("[CatalogAPI]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self.client.get(&url).send().await.context("请求失败")?;
        let page = handle_json_response::<ProductsPage>(response, "服务列表").await?;

        info!(
            "[CatalogAPI] ✅ 服务列表响应，本页 {} 条，总数 {}",
            page.products.len(),
            page.total
        );
        Ok(page)
    }

    async fn get_categories(&self) -> Result<Vec<String>> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/products/categories", self.api_base_url);

        info!("[CatalogAPI] 📡 请求分类列表");
        debug!("[CatalogAPI]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self.client.get(&url).send().await.context("请求失败")?;
        // 分类接口可能返回字符串数组或 {slug, name} 对象数组，统一取 name
        let raw = handle_json_response::<Vec<serde_json::Value>>(response, "分类列表").await?;

        let mut categories = vec![ALL_CATEGORY.to_string()];
        for item in raw {
            match item {
                serde_json::Value::String(s) => categories.push(s),
                serde_json::Value::Object(obj) => {
                    if let Some(name) = obj.get("name").and_then(|v| v.as_str()) {
                        categories.push(name.to_string());
                    }
                }
                _ => {}
            }
        }

        info!(
            "[CatalogAPI] ✅ 分类列表响应，共 {} 个（含 All）",
            categories.len()
        );
        Ok(categories)
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Service> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/products/{}", self.api_base_url, id);

        info!("[CatalogAPI] 📡 请求服务详情 id={}", id);
        debug!("[CatalogAPI]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self.client.get(&url).send().await.context("请求失败")?;
        handle_json_response::<Service>(response, "服务详情").await
    }
}
