//! 集合名常量
//!
//! 与既有外部集成（聊天平台同步、落地页）共享的集合名，
//! 改名即破坏线上契约。

pub const CONTACTS: &str = "customers";
pub const CONNECTIONS: &str = "connections";
pub const SOURCE_TAGS: &str = "sourceTags";
pub const RESERVATIONS: &str = "reservations";
pub const NOTIFICATION_LOGS: &str = "notificationLogs";
