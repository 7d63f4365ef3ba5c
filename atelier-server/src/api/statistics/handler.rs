//! Statistics API Handlers
//!
//! 营销归因看板的唯一数据端点：基线校正总数、窗口内新增、来源
//! 分布（带图表配色）与每日增长序列一次返回。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::attribution::{
    DailyPoint, StatsRange, average_daily_growth, current_total, daily_series, filter_by_window,
    resolve_window, source_breakdown,
};
use crate::core::ServerState;
use crate::db::repository::{connection, source_tag};
use crate::utils::AppResult;
use shared::util::now_millis;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    #[serde(default = "default_range")]
    pub time_range: StatsRange,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_range() -> StatsRange {
    StatsRange::All
}

/// 来源分布的一个扇区（配色由服务端分配，前端直接绘图）
#[derive(Debug, Clone, Serialize)]
pub struct SourceSlice {
    pub source: String,
    pub count: u64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    /// 基线校正后的当前好友总数
    pub current_total: i64,
    /// 窗口内新增连接数（含被屏蔽）
    pub windowed_count: usize,
    /// 窗口内未屏蔽新增 / 序列天数
    pub average_daily_growth: f64,
    pub sources: Vec<SourceSlice>,
    pub daily_series: Vec<DailyPoint>,
}

/// Predefined colors for the source chart
const SOURCE_COLORS: &[&str] = &[
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6",
    "#EC4899", "#06B6D4", "#84CC16", "#F97316", "#6366F1",
];

/// GET /api/statistics - 营销归因统计
pub async fn get_statistics(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<StatisticsResponse>> {
    let tz = state.config.timezone;
    let now_ms = now_millis();

    let window = resolve_window(
        query.time_range,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        tz,
        now_ms,
    )?;

    let all_connections = connection::find_all(state.store.as_ref()).await?;
    let lookup = source_tag::lookup_map(state.store.as_ref()).await?;

    let windowed = filter_by_window(&all_connections, window.as_ref());
    let series = daily_series(&windowed, tz);

    let sources = source_breakdown(&windowed, &lookup)
        .into_iter()
        .enumerate()
        .map(|(i, s)| SourceSlice {
            source: s.source,
            count: s.count,
            color: SOURCE_COLORS[i % SOURCE_COLORS.len()].to_string(),
        })
        .collect();

    Ok(Json(StatisticsResponse {
        current_total: current_total(
            &all_connections,
            state.config.baseline_count,
            state.config.baseline_timestamp_ms,
        ),
        windowed_count: windowed.len(),
        average_daily_growth: average_daily_growth(&windowed, series.len()),
        sources,
        daily_series: series,
    }))
}
