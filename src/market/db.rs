//! SQLite 数据库工具：统一创建连接池
//!
//! 表结构由各存储模块在初始化时按 `CREATE TABLE IF NOT EXISTS` 自行创建

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

/// 创建 SQLite 连接池
pub async fn create_sqlite_pool(db_url: &str) -> Result<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context(format!("连接SQLite数据库失败: {}", db_url))?;

    Ok(pool)
}
