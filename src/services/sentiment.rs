use crate::models::sentiment::{InstrumentQuote, MarketOverview, SentimentLevel};

/// 涨跌停粗略阈值（%），不区分 10%/20% 板
const LIMIT_THRESHOLD: f64 = 9.8;

/// 从全市场行情表归并出市场全景统计
pub fn reduce(table: &[InstrumentQuote]) -> MarketOverview {
    let mut up_count = 0u32;
    let mut down_count = 0u32;
    let mut flat_count = 0u32;
    let mut limit_up = 0u32;
    let mut limit_down = 0u32;
    let mut total = 0.0f64;

    for quote in table {
        if quote.change_pct > 0.0 {
            up_count += 1;
        } else if quote.change_pct < 0.0 {
            down_count += 1;
        } else {
            flat_count += 1;
        }
        if quote.change_pct > LIMIT_THRESHOLD {
            limit_up += 1;
        }
        if quote.change_pct < -LIMIT_THRESHOLD {
            limit_down += 1;
        }
        total += quote.amount;
    }

    MarketOverview {
        up_count,
        down_count,
        flat_count,
        limit_up,
        limit_down,
        total_amount: total / 1e8,
        up_down_ratio: up_count as f64 / down_count.max(1) as f64,
    }
}

/// 情绪综合分 (0-100)：涨跌比 50% + 涨停奖励 30% + 赚钱效应 20%，
/// 四舍五入到一位小数。系数与舍入是对外兼容契约，不能改。
pub fn sentiment_score(overview: &MarketOverview) -> f64 {
    // 涨跌比得分：涨跌比 3.0 即接近满分
    let ratio_score = (overview.up_down_ratio * 33.0).clamp(0.0, 100.0);

    // 涨停奖励：200 家涨停满分
    let limit_score = (overview.limit_up as f64 / 200.0 * 100.0).clamp(0.0, 100.0);

    // 赚钱效应：上涨家数占比，无涨跌家数时记 50
    let total = overview.up_count + overview.down_count;
    let breadth_score = if total > 0 {
        overview.up_count as f64 / total as f64 * 100.0
    } else {
        50.0
    };

    let final_score = ratio_score * 0.5 + limit_score * 0.3 + breadth_score * 0.2;
    (final_score * 10.0).round() / 10.0
}

/// 等级判定：>60 偏乐观，<40 偏悲观，边界 40/60 归中性
pub fn level(score: f64) -> SentimentLevel {
    if score > 60.0 {
        SentimentLevel::Optimistic
    } else if score < 40.0 {
        SentimentLevel::Pessimistic
    } else {
        SentimentLevel::Neutral
    }
}
