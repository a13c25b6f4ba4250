//! 市场客户端核心模块
//!
//! 目录取数、收藏、认证会话与模拟聊天的装配入口

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod client;
pub mod db;
pub mod favorites;
pub mod kv;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util {
    use crate::market::kv::SqliteKvStore;
    use crate::market::types::Service;
    use anyhow::Result;
    use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
    use std::sync::Once;

    static INIT_LOGGER: Once = Once::new();

    /// 初始化测试日志（保留当前 crate 与 sqlx 的 debug，关闭 HTTP 客户端噪音）
    pub fn init_test_logger() {
        INIT_LOGGER.call_once(|| {
            use tracing_subscriber::prelude::*;
            use tracing_subscriber::EnvFilter;

            let filter_layer = EnvFilter::new(
                "info,famous_connect_sdk_rust=debug,sqlx=debug,hyper_util::client=info,reqwest=info",
            );

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_test_writer();

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        });
    }

    /// 构造内存 SQLite 连接池并初始化键值表
    ///
    /// 内存库必须单连接：多连接时每个连接各自是一个独立的空库
    pub async fn memory_pool() -> Result<Pool<Sqlite>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        SqliteKvStore::init_db_with_connection(&pool).await?;
        Ok(pool)
    }

    /// 构造测试用服务条目
    pub fn sample_service(id: i64) -> Service {
        Service {
            id,
            title: format!("Service {}", id),
            description: "测试服务".to_string(),
            price: 100.0,
            discount_percentage: 0.0,
            rating: 4.5,
            stock: 10,
            brand: "Acme".to_string(),
            category: "electronics".to_string(),
            thumbnail: format!("https://cdn.example.com/{}.png", id),
            images: Vec::new(),
        }
    }
}
