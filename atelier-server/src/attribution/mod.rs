//! 营销归因聚合器
//!
//! 对连接历史快照做纯计算：时间窗口解析、基线校正总数、来源
//! 分布与逐日增长序列。无外部调用；三个输入快照（客户/连接/
//! 来源标记）各自异步到达，聚合器容忍瞬时不一致，任一输入变更
//! 时整体重算。

pub mod aggregator;
pub mod window;

pub use aggregator::{
    DailyPoint, FALLBACK_SOURCE, SourceCount, average_daily_growth, current_total, daily_series,
    source_breakdown,
};
pub use window::{StatsRange, Window, filter_by_window, resolve_window};
