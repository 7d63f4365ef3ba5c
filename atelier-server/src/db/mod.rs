//! 数据存储层
//!
//! 托管文档平台的能力抽象。生产部署将托管平台的
//! subscribe/put/update/delete 原语适配到 [`DataStore`]；
//! 内嵌运行与测试使用 [`MemoryStore`]。
//!
//! 一致性模型（与外部平台一致）：
//! - 单文档写入是原子的；跨文档操作是一串独立可失败的写入
//! - 订阅按 watch 语义投递整个集合的完整快照，而不是增量
//! - [`DataStore::update_when`] 提供条件写入，供对账引擎在
//!   认领连接时避免重复绑定竞争

pub mod collections;
pub mod memory;
pub mod repository;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// 存储层 Result 别名
pub type StoreResult<T> = Result<T, StoreError>;

/// A single document in a collection.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

/// 快照订阅句柄 (watch 语义)
///
/// 最新快照随时可读；每次集合变更重新投递完整记录集。
pub type SnapshotRx = watch::Receiver<Vec<Document>>;

/// 存储能力抽象 — 显式注入，绝不做进程级单例
#[async_trait]
pub trait DataStore: Send + Sync {
    /// 集合当前的完整快照
    async fn snapshot(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// 订阅集合的全量快照流
    async fn subscribe(&self, collection: &str) -> StoreResult<SnapshotRx>;

    /// 写入记录
    ///
    /// `merge = true` 时保留未提及的字段；否则整体替换。
    /// `fields` 必须是 JSON object。
    async fn put(&self, collection: &str, id: &str, fields: Value, merge: bool) -> StoreResult<()>;

    /// 部分更新；记录不存在返回 [`StoreError::NotFound`]
    async fn update(&self, collection: &str, id: &str, fields: Value) -> StoreResult<()>;

    /// 条件更新：仅当 `guard_field` 当前等于 `guard_value` 时应用
    ///
    /// 守卫不满足返回 [`StoreError::PreconditionFailed`]。
    async fn update_when(
        &self,
        collection: &str,
        id: &str,
        guard_field: &str,
        guard_value: &Value,
        fields: Value,
    ) -> StoreResult<()>;

    /// 删除记录；记录不存在时为 no-op，返回是否实际删除
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;
}
