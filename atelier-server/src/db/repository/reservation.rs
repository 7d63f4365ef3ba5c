//! Reservation Repository

use serde_json::json;
use shared::models::{Reservation, ReservationCreate};
use shared::util::{now_millis, record_id};

use super::{RepoResult, decode_all, encode, find_one};
use crate::db::{DataStore, collections};

/// 全部预约，按创建时间降序
pub async fn find_all(store: &dyn DataStore) -> RepoResult<Vec<Reservation>> {
    let docs = store.snapshot(collections::RESERVATIONS).await?;
    let mut reservations: Vec<Reservation> = decode_all(collections::RESERVATIONS, docs);
    reservations.sort_by_key(|r| std::cmp::Reverse(r.created_at));
    Ok(reservations)
}

pub async fn find_by_id(store: &dyn DataStore, id: &str) -> RepoResult<Option<Reservation>> {
    find_one(store, collections::RESERVATIONS, id).await
}

/// 创建预约；externalId 由调用方从绑定客户复制（可为空）
pub async fn create(
    store: &dyn DataStore,
    data: ReservationCreate,
    external_id: String,
) -> RepoResult<Reservation> {
    let reservation = Reservation {
        id: record_id(),
        contact_id: data.contact_id,
        customer_name: data.customer_name,
        external_id,
        date_time: data.date_time,
        kind: data.kind,
        status: data.status,
        notified: false,
        created_at: now_millis(),
    };
    store
        .put(
            collections::RESERVATIONS,
            &reservation.id,
            encode(&reservation)?,
            false,
        )
        .await?;
    Ok(reservation)
}

pub async fn mark_notified(store: &dyn DataStore, id: &str) -> RepoResult<()> {
    store
        .update(collections::RESERVATIONS, id, json!({ "notified": true }))
        .await
}
