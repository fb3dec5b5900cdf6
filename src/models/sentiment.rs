use serde::{Deserialize, Serialize};

/// 单只股票的实时行情行（情绪计算的输入）
#[derive(Debug, Clone, Default)]
pub struct InstrumentQuote {
    pub code: String,
    pub name: String,
    /// 最新价
    pub price: f64,
    /// 涨跌幅 %
    pub change_pct: f64,
    /// 成交额（元）
    pub amount: f64,
}

/// 市场全景统计：每个周期从行情表整体重算，不单独落盘
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOverview {
    pub up_count: u32,
    pub down_count: u32,
    pub flat_count: u32,
    pub limit_up: u32,
    pub limit_down: u32,
    /// 总成交额（亿元）
    pub total_amount: f64,
    /// 涨跌比，跌家数下限取 1 避免除零
    pub up_down_ratio: f64,
}

/// 情绪等级：score 的纯函数，60/40 为闭区间边界（都算中性）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLevel {
    #[serde(rename = "偏乐观")]
    Optimistic,
    #[serde(rename = "偏悲观")]
    Pessimistic,
    #[serde(rename = "中性")]
    Neutral,
}

/// 落盘的涨跌家数统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentStats {
    pub up: u32,
    pub down: u32,
    pub limit_up: u32,
    pub limit_down: u32,
}

/// 指数行情（名称 + 最新价 + 涨跌幅）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexQuote {
    pub name: String,
    pub price: f64,
    pub change: f64,
}

/// market_sentiment.json 的完整内容，每周期整体替换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    /// "HH:MM"
    pub updated_at: String,
    /// 综合情绪分，一位小数
    pub score: f64,
    pub level: SentimentLevel,
    pub stats: SentimentStats,
    pub indices: Vec<IndexQuote>,
}
