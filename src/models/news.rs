use serde::{Deserialize, Serialize};

/// 上游快讯原始行。字段可能缺失（留空），回退逻辑统一由加工管道负责。
#[derive(Debug, Clone, Default)]
pub struct RawNewsItem {
    pub title: String,
    pub content: String,
    /// "YYYY-MM-DD HH:MM:SS"，缺失时为空串
    pub publish_time: String,
}

/// AI 加工后的新闻条目（news_data.json 的元素）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    /// 内容指纹：规范化标题 + 发布时间的 SHA-256，
    /// 同一事件重复采集得到相同 id
    pub id: String,
    pub title: String,
    pub content: String,
    /// 来源媒体
    pub source: String,
    pub publish_time: String,
    /// 申万行业标签
    pub industry: String,
    /// 重要性评分 (0-100)
    pub score: i64,
    /// AI 一句话理由
    pub ai_reason: String,
}
