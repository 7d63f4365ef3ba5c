//! 服务器共享状态

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use shared::models::{SyncPayload, SyncStatus};

use crate::db::{DataStore, MemoryStore};
use crate::notify::{NotifyService, WebhookClient};
use crate::reconcile::ReconcileService;
use crate::utils::{AppError, AppResult};

use super::config::Config;

/// 资源版本计数器
///
/// 每种资源类型独立维护一个单调递增版本号，写操作成功后递增并随
/// [`SyncPayload`] 广播，客户端据此判断本地缓存是否过期。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增并返回新版本号
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    pub fn all(&self) -> HashMap<String, u64> {
        self.versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

/// 服务器共享状态
///
/// 所有 HTTP 处理器通过 `State<ServerState>` 访问。克隆廉价：
/// 内部字段全部为 `Arc`。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DataStore>,
    pub versions: Arc<ResourceVersions>,
    pub reconcile: ReconcileService,
    pub notify: NotifyService,
    /// 实例 epoch，客户端用于检测服务器重启
    pub epoch: String,
    sync_tx: broadcast::Sender<SyncPayload>,
}

impl ServerState {
    /// 初始化服务器状态（内存存储）
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
        Self::with_store(config, store)
    }

    /// 使用注入的存储初始化，测试时传入预置好的 [`MemoryStore`]
    pub fn with_store(config: &Config, store: Arc<dyn DataStore>) -> AppResult<Self> {
        let webhook = WebhookClient::new(
            config.webhook_url.clone(),
            Duration::from_millis(config.request_timeout_ms),
        )
        .map_err(|e| AppError::Internal(format!("Failed to build webhook client: {e}")))?;

        let (sync_tx, _) = broadcast::channel(256);

        Ok(Self {
            config: Arc::new(config.clone()),
            reconcile: ReconcileService::new(store.clone()),
            notify: NotifyService::new(store.clone(), webhook),
            store,
            versions: Arc::new(ResourceVersions::new()),
            epoch: Uuid::new_v4().to_string(),
            sync_tx,
        })
    }

    /// 广播资源变更
    ///
    /// 递增对应资源的版本号并向所有订阅者发送 [`SyncPayload`]。
    /// 没有订阅者不是错误。
    pub fn broadcast_sync(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<serde_json::Value>,
    ) {
        let version = self.versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data,
        };
        if self.sync_tx.send(payload).is_err() {
            tracing::trace!(resource, action, "No sync subscribers");
        }
    }

    /// 订阅资源变更广播
    ///
    /// 进程内总线。对外推送通道（SSE/WebSocket）尚未开放，HTTP
    /// 客户端目前通过 /api/sync/status 的版本号轮询感知变更。
    // TODO: 前端接入后通过 SSE 路由把 SyncPayload 推给浏览器
    pub fn subscribe_sync(&self) -> broadcast::Receiver<SyncPayload> {
        self.sync_tx.subscribe()
    }

    /// 当前同步状态快照
    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            epoch: self.epoch.clone(),
            versions: self.versions.all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_count_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("contact"), 0);
        assert_eq!(versions.increment("contact"), 1);
        assert_eq!(versions.increment("contact"), 2);
        assert_eq!(versions.increment("reservation"), 1);
        assert_eq!(versions.get("contact"), 2);
    }

    #[tokio::test]
    async fn broadcast_reaches_subscriber() {
        let config = Config::with_overrides(0, "");
        let state = ServerState::initialize(&config).unwrap();
        let mut rx = state.subscribe_sync();

        state.broadcast_sync("contact", "created", "c1", None);

        let payload = rx.recv().await.unwrap();
        assert_eq!(payload.resource, "contact");
        assert_eq!(payload.version, 1);
        assert_eq!(payload.id, "c1");

        let status = state.sync_status();
        assert_eq!(status.versions.get("contact"), Some(&1));
    }
}
