//! Reconciliation Service
//!
//! 跨文档写操作。与外部平台一致：单文档写入原子，跨文档操作是
//! 一串独立可失败的写入——任何一步失败都向调用方返回错误，
//! 不得伪装成功。认领连接使用条件写入，两个操作员同时绑定同一
//! 待处理条目时只有一个成功。

use std::sync::Arc;

use shared::models::{Contact, InboundConnection};
use shared::util::{now_millis, record_id};

use crate::db::repository::{connection, contact};
use crate::db::{DataStore, StoreError};
use crate::utils::{AppError, AppResult};

use super::engine::pending_inbox;

/// Tag stamped onto contacts synthesized by quick-create.
pub const AUTO_CREATED_TAG: &str = "auto-created";

#[derive(Clone)]
pub struct ReconcileService {
    store: Arc<dyn DataStore>,
}

impl ReconcileService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// 待处理收件箱：未绑定且 externalId 未被任何客户认领
    pub async fn pending_inbox(&self) -> AppResult<Vec<InboundConnection>> {
        let connections = connection::find_all(self.store.as_ref()).await?;
        let contacts = contact::find_all(self.store.as_ref()).await?;
        Ok(pending_inbox(&connections, &contacts)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 将连接绑定到既有客户
    ///
    /// 先条件认领连接（isBound == false 守卫），再写客户身份字段。
    /// 认领失败返回 Conflict；认领成功但客户写入失败时错误原样
    /// 上抛——连接已认领、客户未更新是已知的一致性缺口，由操作员
    /// 重试客户侧写入。
    pub async fn bind(&self, connection_id: &str, contact_id: &str) -> AppResult<Contact> {
        let conn = connection::find_by_id(self.store.as_ref(), connection_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Connection {connection_id}")))?;
        if conn.is_bound {
            return Err(AppError::Conflict(format!(
                "Connection {connection_id} is already bound"
            )));
        }

        let existing = contact::find_by_id(self.store.as_ref(), contact_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contact {contact_id}")))?;

        self.claim_and_link(&conn, &existing).await?;

        contact::find_by_id(self.store.as_ref(), contact_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contact {contact_id}")))
    }

    /// 快速建档并绑定
    ///
    /// 以连接的 displayName 为客户姓名合成新客户。非幂等：调用方
    /// 必须先检查 isBound，重复调用会产生重复客户。客户先落盘、
    /// 后认领；认领输掉并发竞争时返回 Conflict，已合成的客户残留
    /// 在存储中（无回滚），由操作员手工删除。
    pub async fn quick_create_and_bind(&self, connection_id: &str) -> AppResult<Contact> {
        let conn = connection::find_by_id(self.store.as_ref(), connection_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Connection {connection_id}")))?;
        if conn.is_bound {
            return Err(AppError::Conflict(format!(
                "Connection {connection_id} is already bound"
            )));
        }

        let contact = Contact {
            id: record_id(),
            name: conn.display_name.clone(),
            phone: String::new(),
            address: String::new(),
            external_id: String::new(),
            external_display_name: String::new(),
            avatar_url: String::new(),
            tags: vec![AUTO_CREATED_TAG.to_string()],
            created_at: now_millis(),
        };
        contact::insert(self.store.as_ref(), &contact).await?;

        self.claim_and_link(&conn, &contact).await?;

        contact::find_by_id(self.store.as_ref(), &contact.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contact {}", contact.id)))
    }

    /// 解绑客户的聊天平台身份
    ///
    /// 清空客户的 externalId/externalDisplayName/avatarUrl，并将对应
    /// 连接的 isBound 重置为 false，使其回到待处理收件箱。重置连接
    /// 是对旧行为（连接悬挂在已认领状态）的刻意修正。
    pub async fn unlink(&self, contact_id: &str) -> AppResult<Contact> {
        let existing = contact::find_by_id(self.store.as_ref(), contact_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contact {contact_id}")))?;

        let external_id = existing.external_id.clone();
        contact::set_identity(self.store.as_ref(), contact_id, "", "", "").await?;

        if !external_id.is_empty() {
            match connection::find_by_external_id(self.store.as_ref(), &external_id).await? {
                Some(conn) if conn.is_bound => {
                    connection::release(self.store.as_ref(), &conn.id).await?;
                }
                _ => {
                    // 连接可能从未存在（手工录入的 externalId）
                    tracing::debug!(contact_id, external_id, "Unlink without bound connection");
                }
            }
        }

        contact::find_by_id(self.store.as_ref(), contact_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contact {contact_id}")))
    }

    /// 删除客户记录
    ///
    /// 不级联：引用该客户的预约与连接原样保留，展示层需容忍
    /// 失效引用。
    pub async fn delete_contact(&self, contact_id: &str) -> AppResult<bool> {
        Ok(contact::delete(self.store.as_ref(), contact_id).await?)
    }

    /// 条件认领连接，然后写客户身份字段
    async fn claim_and_link(&self, conn: &InboundConnection, target: &Contact) -> AppResult<()> {
        match connection::claim(self.store.as_ref(), &conn.id).await {
            Ok(()) => {}
            Err(StoreError::PreconditionFailed(_)) => {
                return Err(AppError::Conflict(format!(
                    "Connection {} was claimed concurrently",
                    conn.id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        contact::set_identity(
            self.store.as_ref(),
            &target.id,
            &conn.external_id,
            &conn.display_name,
            &conn.avatar_url,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::db::collections;
    use crate::db::repository::encode;
    use shared::models::{ContactCreate, InboundConnection};

    const TOKEN: &str = "U0123456789abcdef01234567"; // 25 chars

    async fn seed_connection(store: &MemoryStore, id: &str, external_id: &str) {
        let conn = InboundConnection {
            id: id.to_string(),
            external_id: external_id.to_string(),
            display_name: format!("line_user_{id}"),
            avatar_url: "https://cdn.example/avatar.png".to_string(),
            is_bound: false,
            timestamp: 1_700_000_000_000,
            source: "ig_promo".to_string(),
            is_blocked: false,
        };
        store
            .put(collections::CONNECTIONS, id, encode(&conn).unwrap(), false)
            .await
            .unwrap();
    }

    fn service(store: &Arc<MemoryStore>) -> ReconcileService {
        ReconcileService::new(store.clone() as Arc<dyn DataStore>)
    }

    #[tokio::test]
    async fn bind_links_both_sides() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        seed_connection(&store, "conn1", TOKEN).await;
        let created = contact::create(
            store.as_ref() as &dyn DataStore,
            ContactCreate {
                name: "王小姐".to_string(),
                phone: "0912".to_string(),
                address: String::new(),
                tags: Vec::new(),
            },
        )
        .await
        .unwrap();

        let bound = svc.bind("conn1", &created.id).await.unwrap();

        assert_eq!(bound.external_id, TOKEN);
        assert_eq!(bound.external_display_name, "line_user_conn1");
        assert!(crate::reconcile::is_linked(&bound));
        let conn = connection::find_by_id(store.as_ref() as &dyn DataStore, "conn1")
            .await
            .unwrap()
            .unwrap();
        assert!(conn.is_bound);
        assert!(svc.pending_inbox().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_bind_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        seed_connection(&store, "conn1", TOKEN).await;
        let c1 = contact::create(
            store.as_ref() as &dyn DataStore,
            ContactCreate {
                name: "a".into(),
                phone: String::new(),
                address: String::new(),
                tags: Vec::new(),
            },
        )
        .await
        .unwrap();
        let c2 = contact::create(
            store.as_ref() as &dyn DataStore,
            ContactCreate {
                name: "b".into(),
                phone: String::new(),
                address: String::new(),
                tags: Vec::new(),
            },
        )
        .await
        .unwrap();

        svc.bind("conn1", &c1.id).await.unwrap();
        let err = svc.bind("conn1", &c2.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn quick_create_synthesizes_tagged_contact() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        seed_connection(&store, "conn1", TOKEN).await;

        let created = svc.quick_create_and_bind("conn1").await.unwrap();

        assert_eq!(created.name, "line_user_conn1");
        assert_eq!(created.tags, vec![AUTO_CREATED_TAG.to_string()]);
        assert_eq!(created.phone, "");
        assert_eq!(created.external_id, TOKEN);
        assert!(svc.pending_inbox().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unlink_returns_connection_to_pending_inbox() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        seed_connection(&store, "conn1", TOKEN).await;
        let created = svc.quick_create_and_bind("conn1").await.unwrap();

        let unlinked = svc.unlink(&created.id).await.unwrap();

        assert_eq!(unlinked.external_id, "");
        assert_eq!(unlinked.external_display_name, "");
        assert_eq!(unlinked.avatar_url, "");
        // Corrected behavior: the connection is released, not left
        // dangling in the claimed-but-orphaned state.
        let inbox = svc.pending_inbox().await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].id, "conn1");
    }

    #[tokio::test]
    async fn delete_does_not_cascade() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        seed_connection(&store, "conn1", TOKEN).await;
        let created = svc.quick_create_and_bind("conn1").await.unwrap();

        assert!(svc.delete_contact(&created.id).await.unwrap());

        // The bound connection survives; with its claimant gone it is
        // bound yet unclaimed, and stays out of the inbox.
        let conn = connection::find_by_id(store.as_ref() as &dyn DataStore, "conn1")
            .await
            .unwrap()
            .unwrap();
        assert!(conn.is_bound);
        assert!(svc.pending_inbox().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bind_missing_connection_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let err = svc.bind("ghost", "nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
