//! Sync Payloads

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 资源变更通知
///
/// 每次写操作成功后广播给所有在线客户端。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    /// 资源类型 (如 "contact", "connection", "reservation")
    pub resource: String,
    /// 单调递增版本号（按资源类型独立计数）
    pub version: u64,
    /// 变更类型 ("created", "updated", "deleted")
    pub action: String,
    /// 资源 ID
    pub id: String,
    /// 资源数据 (deleted 时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// 同步状态响应
///
/// 用于客户端重连时检查资源版本
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// 服务器实例 epoch (启动时生成的 UUID)
    /// 用于检测服务器重启
    pub epoch: String,
    /// 各资源类型的当前版本
    pub versions: HashMap<String, u64>,
}
