//! Contact Repository

use serde_json::json;
use shared::models::{Contact, ContactCreate, ContactUpdate};
use shared::util::{now_millis, record_id};

use super::{RepoResult, decode_all, encode, find_one};
use crate::db::{DataStore, StoreError, collections};

/// 全部客户，按创建时间降序
pub async fn find_all(store: &dyn DataStore) -> RepoResult<Vec<Contact>> {
    let docs = store.snapshot(collections::CONTACTS).await?;
    let mut contacts: Vec<Contact> = decode_all(collections::CONTACTS, docs);
    contacts.sort_by_key(|c| std::cmp::Reverse(c.created_at));
    Ok(contacts)
}

pub async fn find_by_id(store: &dyn DataStore, id: &str) -> RepoResult<Option<Contact>> {
    find_one(store, collections::CONTACTS, id).await
}

pub async fn create(store: &dyn DataStore, data: ContactCreate) -> RepoResult<Contact> {
    let contact = Contact {
        id: record_id(),
        name: data.name,
        phone: data.phone,
        address: data.address,
        external_id: String::new(),
        external_display_name: String::new(),
        avatar_url: String::new(),
        tags: data.tags,
        created_at: now_millis(),
    };
    store
        .put(collections::CONTACTS, &contact.id, encode(&contact)?, false)
        .await?;
    Ok(contact)
}

/// 直接写入完整客户记录（quick-create 场景由调用方构造）
pub async fn insert(store: &dyn DataStore, contact: &Contact) -> RepoResult<()> {
    store
        .put(collections::CONTACTS, &contact.id, encode(contact)?, false)
        .await
}

pub async fn update(store: &dyn DataStore, id: &str, data: ContactUpdate) -> RepoResult<Contact> {
    let mut fields = serde_json::Map::new();
    if let Some(name) = data.name {
        fields.insert("name".into(), json!(name));
    }
    if let Some(phone) = data.phone {
        fields.insert("phone".into(), json!(phone));
    }
    if let Some(address) = data.address {
        fields.insert("address".into(), json!(address));
    }
    if let Some(tags) = data.tags {
        fields.insert("tags".into(), json!(tags));
    }
    if !fields.is_empty() {
        store
            .update(collections::CONTACTS, id, serde_json::Value::Object(fields))
            .await?;
    }
    find_by_id(store, id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Contact {id}")))
}

/// 设置/清除聊天平台身份字段（bind 与 unlink 共用）
pub async fn set_identity(
    store: &dyn DataStore,
    id: &str,
    external_id: &str,
    display_name: &str,
    avatar_url: &str,
) -> RepoResult<()> {
    store
        .update(
            collections::CONTACTS,
            id,
            json!({
                "externalId": external_id,
                "externalDisplayName": display_name,
                "avatarUrl": avatar_url,
            }),
        )
        .await
}

pub async fn delete(store: &dyn DataStore, id: &str) -> RepoResult<bool> {
    store.delete(collections::CONTACTS, id).await
}
