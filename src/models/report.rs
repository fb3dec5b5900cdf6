use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 单个时段的复盘条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub title: String,
    /// 生成时间 "HH:MM"
    pub time: String,
    pub content: String,
}

/// market_reports.json：date 建档时写一次，之后各时段条目独立覆盖，
/// 互不影响（读-改-写整份文档是唯一支持的更新方式）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// "YYYY-MM-DD"
    pub date: String,
    /// 时段标签 -> 条目，如 "midday" / "close"
    #[serde(flatten)]
    pub periods: BTreeMap<String, ReportEntry>,
}
