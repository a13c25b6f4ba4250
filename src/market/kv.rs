//! 本地键值存储
//!
//! 承担移动端 AsyncStorage 的角色：字符串键、若干 JSON 小块
//! （收藏列表、会话缓存），无事务、无 schema。

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

/// 异步字符串键值存储接口
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值，不存在返回 None
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入（覆盖）键值
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// 删除键；键不存在时为无操作
    async fn remove(&self, key: &str) -> Result<()>;
}

/// 基于 SQLite 的键值存储（单张 local_kv 表）
pub struct SqliteKvStore {
    db: Pool<Sqlite>,
}

impl SqliteKvStore {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// 初始化键值表结构
    pub async fn init_db(&self) -> Result<()> {
        Self::init_db_with_connection(&self.db).await
    }

    /// 使用共享连接初始化键值表结构（静态方法）
    pub async fn init_db_with_connection(db: &Pool<Sqlite>) -> Result<()> {
        info!("[KvStore/DB] 初始化本地键值表结构");

        let sql = r#"
            CREATE TABLE IF NOT EXISTS local_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL DEFAULT ''
            )
        "#;
        sqlx::query(sql)
            .execute(db)
            .await
            .context("创建键值表失败")?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT value FROM local_kv WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .context("查询键值失败")?;

        let value = row.map(|row| row.get::<String, _>("value"));
        debug!("[KvStore] 读取 key={}, 命中: {}", key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO local_kv (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await
        .context("写入键值失败")?;

        debug!("[KvStore] 写入 key={}, {} 字节", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM local_kv WHERE key = ?
            "#,
        )
        .bind(key)
        .execute(&self.db)
        .await
        .context("删除键值失败")?;

        debug!("[KvStore] 删除 key={}", key);
        Ok(())
    }
}
