//! Inbound Connection Repository

use serde_json::json;
use shared::models::InboundConnection;

use super::{RepoResult, decode_all, find_one};
use crate::db::{DataStore, collections};

/// 全部连接，按首次出现时间降序（上游契约：最新在前）
pub async fn find_all(store: &dyn DataStore) -> RepoResult<Vec<InboundConnection>> {
    let docs = store.snapshot(collections::CONNECTIONS).await?;
    let mut connections: Vec<InboundConnection> = decode_all(collections::CONNECTIONS, docs);
    connections.sort_by_key(|c| std::cmp::Reverse(c.timestamp));
    Ok(connections)
}

pub async fn find_by_id(
    store: &dyn DataStore,
    id: &str,
) -> RepoResult<Option<InboundConnection>> {
    find_one(store, collections::CONNECTIONS, id).await
}

/// 条件认领：仅当 isBound 仍为 false 时置 true
///
/// 守卫不满足（已被其他操作员认领）返回 PreconditionFailed。
pub async fn claim(store: &dyn DataStore, id: &str) -> RepoResult<()> {
    store
        .update_when(
            collections::CONNECTIONS,
            id,
            "isBound",
            &json!(false),
            json!({ "isBound": true }),
        )
        .await
}

/// 释放连接（unlink 修正行为：回到待处理收件箱）
pub async fn release(store: &dyn DataStore, id: &str) -> RepoResult<()> {
    store
        .update(collections::CONNECTIONS, id, json!({ "isBound": false }))
        .await
}

/// 按 externalId 查找连接
pub async fn find_by_external_id(
    store: &dyn DataStore,
    external_id: &str,
) -> RepoResult<Option<InboundConnection>> {
    Ok(find_all(store)
        .await?
        .into_iter()
        .find(|c| c.external_id == external_id))
}
