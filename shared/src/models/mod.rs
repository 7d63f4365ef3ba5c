//! Wire Models
//!
//! 与既有聊天平台集成、落地页共享的数据契约。
//! 所有模型序列化为 camelCase，时间戳一律 Unix 毫秒 (i64)。

mod connection;
mod contact;
mod notification_log;
mod reservation;
mod source_tag;
mod sync;

pub use connection::InboundConnection;
pub use contact::{Contact, ContactCreate, ContactUpdate};
pub use notification_log::{NotificationLogEntry, NotifyStatus};
pub use reservation::{Reservation, ReservationCreate};
pub use source_tag::SourceTag;
pub use sync::{SyncPayload, SyncStatus};
