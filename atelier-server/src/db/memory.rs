//! 内存存储实现
//!
//! [`MemoryStore`] 以 DashMap 管理集合，tokio watch 通道投递全量
//! 快照。内嵌运行与测试共用这一实现；它满足与托管平台相同的
//! 一致性模型（单文档原子写，无跨文档事务）。

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::watch;

use super::{DataStore, Document, SnapshotRx, StoreError, StoreResult};

struct Collection {
    docs: BTreeMap<String, Map<String, Value>>,
    tx: watch::Sender<Vec<Document>>,
}

impl Collection {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            docs: BTreeMap::new(),
            tx,
        }
    }

    fn snapshot(&self) -> Vec<Document> {
        self.docs
            .iter()
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: Value::Object(fields.clone()),
            })
            .collect()
    }

    /// 变更后重新投递完整快照
    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

/// 进程内文档存储
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
        }
    }
}

fn as_object(fields: Value) -> StoreResult<Map<String, Value>> {
    match fields {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "document fields must be a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn snapshot(&self, collection: &str) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| c.snapshot())
            .unwrap_or_default())
    }

    async fn subscribe(&self, collection: &str) -> StoreResult<SnapshotRx> {
        let entry = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);
        Ok(entry.tx.subscribe())
    }

    async fn put(&self, collection: &str, id: &str, fields: Value, merge: bool) -> StoreResult<()> {
        let incoming = as_object(fields)?;
        let mut entry = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);

        match entry.docs.get_mut(id) {
            Some(existing) if merge => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
            }
            _ => {
                entry.docs.insert(id.to_string(), incoming);
            }
        }
        entry.publish();
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> StoreResult<()> {
        let incoming = as_object(fields)?;
        let mut entry = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);

        let existing = entry
            .docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        for (k, v) in incoming {
            existing.insert(k, v);
        }
        entry.publish();
        Ok(())
    }

    async fn update_when(
        &self,
        collection: &str,
        id: &str,
        guard_field: &str,
        guard_value: &Value,
        fields: Value,
    ) -> StoreResult<()> {
        let incoming = as_object(fields)?;
        let mut entry = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);

        let existing = entry
            .docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;

        let current = existing.get(guard_field).unwrap_or(&Value::Null);
        if current != guard_value {
            return Err(StoreError::PreconditionFailed(format!(
                "{collection}/{id}: {guard_field} is {current}, expected {guard_value}"
            )));
        }

        for (k, v) in incoming {
            existing.insert(k, v);
        }
        entry.publish();
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut entry = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);
        let removed = entry.docs.remove(id).is_some();
        if removed {
            entry.publish();
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_then_snapshot_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("c", "1", json!({"id": "1", "name": "a"}), false)
            .await
            .unwrap();
        let docs = store.snapshot("c").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["name"], "a");
    }

    #[tokio::test]
    async fn merge_keeps_unmentioned_fields() {
        let store = MemoryStore::new();
        store
            .put("c", "1", json!({"id": "1", "name": "a", "phone": "x"}), false)
            .await
            .unwrap();
        store
            .put("c", "1", json!({"name": "b"}), true)
            .await
            .unwrap();
        let docs = store.snapshot("c").await.unwrap();
        assert_eq!(docs[0].fields["name"], "b");
        assert_eq!(docs[0].fields["phone"], "x");
    }

    #[tokio::test]
    async fn update_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update("c", "ghost", json!({"x": 1})).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_when_guards_against_stale_state() {
        let store = MemoryStore::new();
        store
            .put("c", "1", json!({"id": "1", "isBound": false}), false)
            .await
            .unwrap();

        store
            .update_when("c", "1", "isBound", &json!(false), json!({"isBound": true}))
            .await
            .unwrap();

        // Second claim must fail: the guard no longer holds.
        let err = store
            .update_when("c", "1", "isBound", &json!(false), json!({"isBound": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn subscribe_sees_latest_snapshot_on_every_change() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe("c").await.unwrap();
        assert!(rx.borrow().is_empty());

        store
            .put("c", "1", json!({"id": "1"}), false)
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.delete("c", "1").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn non_object_fields_are_rejected() {
        let store = MemoryStore::new();
        let err = store.put("c", "1", json!([1, 2]), false).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
