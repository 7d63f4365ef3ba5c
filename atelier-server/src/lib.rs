//! Atelier CRM Server - 室内设计工作室业务管理后端
//!
//! # 架构概述
//!
//! 本模块是服务器主入口，提供以下核心功能：
//!
//! - **身份对账** (`reconcile`): 聊天平台联系人 ↔ CRM 客户绑定
//! - **营销归因** (`attribution`): 时间窗口 KPI 与来源分布统计
//! - **预约通知** (`notify`): 预约创建触发外部 webhook 并记录审计日志
//! - **数据存储** (`db`): 注入式 DataStore 能力抽象 + 内存实现
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! atelier-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── db/            # 存储边界与类型化仓库
//! ├── reconcile/     # 身份对账引擎
//! ├── attribution/   # 归因聚合器
//! ├── notify/        # 通知触发器与 webhook 客户端
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间、CSV、地址解析
//! ```

pub mod api;
pub mod attribution;
pub mod core;
pub mod db;
pub mod notify;
pub mod reconcile;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use db::{DataStore, MemoryStore};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___   __       ___
   /   | / /____  / (_)__  _____
  / /| |/ __/ _ \/ / / _ \/ ___/
 / ___ / /_/  __/ / /  __/ /
/_/  |_\__/\___/_/_/\___/_/
    "#
    );
}
