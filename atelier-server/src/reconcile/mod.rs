//! 身份对账引擎
//!
//! 维护聊天平台连接 (InboundConnection) 与 CRM 客户 (Contact) 之间的
//! 绑定关系：
//!
//! - [`engine`] - 纯谓词与待处理收件箱计算
//! - [`service`] - 绑定/解绑/快速建档等跨文档写操作

pub mod engine;
pub mod service;

pub use engine::{is_linked, pending_inbox};
pub use service::ReconcileService;
