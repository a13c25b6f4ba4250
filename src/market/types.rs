use serde::{Deserialize, Serialize};

/// 服务条目（远端目录中的一条 listing）
/// 可以直接从服务器返回的 JSON 反序列化，缺失的字段使用默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// 条目 ID，全目录唯一且跨次拉取稳定，收藏以它为键
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 原价（非负）
    #[serde(default)]
    pub price: f64,
    /// 折扣百分比，0–100，仅用于展示计算
    #[serde(default)]
    pub discount_percentage: f64,
    /// 展示用评分，本地不重算
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    /// 品牌（服务器可能不返回）
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    /// 封面图
    #[serde(default)]
    pub thumbnail: String,
    /// 图片列表（有序，可为空）
    #[serde(default)]
    pub images: Vec<String>,
}

impl Service {
    /// 折后价展示值（两位小数字符串），不作为派生字段持久化
    pub fn discounted_price(&self) -> String {
        format!(
            "{:.2}",
            self.price * (1.0 - self.discount_percentage / 100.0)
        )
    }
}

/// 列表接口的响应信封
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsPage {
    #[serde(default)]
    pub products: Vec<Service>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
}

/// 通用 HTTP 响应处理函数：检查状态码后直接反序列化为目标结构体
/// dummyjson 风格接口没有错误码信封，非 2xx 即视为失败
/// 所有 API 都可以共用此方法
pub async fn handle_json_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<T> {
    use anyhow::Context;
    use tracing::{debug, error};

    let status = response.status();

    // 读取 body bytes（只能读取一次）
    let body_bytes = response.bytes().await.context("读取响应 body 失败")?;

    if !status.is_success() {
        let body_str = String::from_utf8_lossy(&body_bytes);
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
    }
    debug!("[HTTP] {}请求成功，HTTP状态: {}", operation_name, status);

    let parsed: T = serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name,
            e,
            String::from_utf8_lossy(&body_bytes)
        );
        anyhow::anyhow!("反序列化响应失败: {:?}", e)
    })?;

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discounted_price_rounds_to_two_decimals() {
        let mut svc = crate::market::test_util::sample_service(1);
        svc.price = 100.0;
        svc.discount_percentage = 20.0;
        assert_eq!(svc.discounted_price(), "80.00");

        svc.price = 19.99;
        svc.discount_percentage = 0.0;
        assert_eq!(svc.discounted_price(), "19.99");
    }

    #[test]
    fn deserialize_service_with_missing_fields() {
        // brand/images 等字段服务器可能不返回
        let json = r#"{
            "id": 42,
            "title": "Premium Car Wash",
            "description": "Full detail",
            "price": 50.5,
            "discountPercentage": 10.0,
            "rating": 4.8,
            "category": "automotive",
            "thumbnail": "https://cdn.example.com/42.png"
        }"#;
        let svc: Service = serde_json::from_str(json).unwrap();
        assert_eq!(svc.id, 42);
        assert_eq!(svc.discount_percentage, 10.0);
        assert_eq!(svc.brand, "");
        assert!(svc.images.is_empty());
        assert_eq!(svc.stock, 0);
    }

    #[test]
    fn deserialize_products_page_envelope() {
        let json = r#"{
            "products": [{"id": 1, "title": "A", "price": 10.0}],
            "total": 194,
            "skip": 0,
            "limit": 10
        }"#;
        let page: ProductsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total, 194);
        assert_eq!(page.limit, 10);
    }
}
