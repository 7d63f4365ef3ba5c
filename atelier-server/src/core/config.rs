use std::str::FromStr;

use chrono_tz::Tz;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | WEBHOOK_URL | (空) | 预约通知 webhook 地址，空则通知记为 failed |
/// | TIMEZONE | Asia/Taipei | 业务时区 |
/// | BASELINE_COUNT | 858 | 基线好友数（系统化追踪之前的人工盘点） |
/// | BASELINE_TIMESTAMP_MS | 1711900799999 | 基线时间点 (Unix 毫秒) |
/// | OPERATOR_NAME | system | 审计日志中记录的操作员名 |
/// | REQUEST_TIMEOUT_MS | 10000 | 外部调用超时(毫秒) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 WEBHOOK_URL=https://hooks.example/x cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 预约通知 webhook 地址
    pub webhook_url: String,
    /// 业务时区（统计按此时区分桶）
    pub timezone: Tz,
    /// 基线好友数
    pub baseline_count: i64,
    /// 基线时间点 (Unix 毫秒)
    pub baseline_timestamp_ms: i64,
    /// 默认操作员名（无登录体系，审计仍需落操作员）
    pub operator_name: String,
    /// 外部调用超时 (毫秒)
    pub request_timeout_ms: u64,
    /// 运行环境: development | staging | production
    pub environment: String,
}

/// 基线默认值：2024-03-31 23:59:59.999 +08:00 的人工盘点
const DEFAULT_BASELINE_COUNT: i64 = 858;
const DEFAULT_BASELINE_TIMESTAMP_MS: i64 = 1_711_900_799_999;

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            webhook_url: std::env::var("WEBHOOK_URL").unwrap_or_default(),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|s| match Tz::from_str(&s) {
                    Ok(tz) => Some(tz),
                    Err(_) => {
                        tracing::warn!("Invalid TIMEZONE '{}', falling back to Asia/Taipei", s);
                        None
                    }
                })
                .unwrap_or(chrono_tz::Asia::Taipei),
            baseline_count: std::env::var("BASELINE_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BASELINE_COUNT),
            baseline_timestamp_ms: std::env::var("BASELINE_TIMESTAMP_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BASELINE_TIMESTAMP_MS),
            operator_name: std::env::var("OPERATOR_NAME").unwrap_or_else(|_| "system".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(http_port: u16, webhook_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.webhook_url = webhook_url.into();
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
