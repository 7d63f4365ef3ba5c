//! Source Attribution Repository

use std::collections::HashMap;

use shared::models::SourceTag;

use super::{RepoResult, decode_all};
use crate::db::{DataStore, collections};

pub async fn find_all(store: &dyn DataStore) -> RepoResult<Vec<SourceTag>> {
    let docs = store.snapshot(collections::SOURCE_TAGS).await?;
    Ok(decode_all(collections::SOURCE_TAGS, docs))
}

/// `externalId → source` 查找表
///
/// 同一 externalId 出现多条时保留最早写入的一条（落地页先到先得）。
pub async fn lookup_map(store: &dyn DataStore) -> RepoResult<HashMap<String, String>> {
    let mut tags = find_all(store).await?;
    tags.sort_by_key(|t| t.created_at);
    let mut map = HashMap::with_capacity(tags.len());
    for tag in tags {
        map.entry(tag.external_id).or_insert(tag.source);
    }
    Ok(map)
}
