//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`logger`] - 日志初始化
//! - [`time`] - 业务时区时间换算
//! - [`csv`] - 联系人导出的 CSV 引用规则
//! - [`address`] - 地址 → 县市/行政区 解析

pub mod address;
pub mod csv;
pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResult};
