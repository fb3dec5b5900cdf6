use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};

use crate::models::ai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::models::config::ReportConfig;
use crate::models::report::{ReportDocument, ReportEntry};
use crate::utils::http::build_ai_client;

/// 复盘报告时段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Midday,
    Close,
}

impl ReportPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Midday => "midday",
            ReportPeriod::Close => "close",
        }
    }
}

/// 复盘报告生成器：委托 chat/completions 服务产出叙事正文。
/// 生成是全有或全无的：任何失败都向上返回错误，由任务整体
/// 放弃本轮写入，绝不落盘半截报告。
pub struct ReportService {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ReportService {
    /// api_key 未配置时返回 None，调用方按周期跳过报告任务
    pub fn from_config(config: &ReportConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        Ok(Some(Self {
            client: build_ai_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }))
    }

    /// 生成指定时段的复盘正文（原样取第一条 message 的文本，不做 JSON 解析）
    pub async fn generate(&self, period: ReportPeriod) -> Result<String> {
        let prompt = format!(
            "请作为资深分析师，写一份A股{}复盘报告。重点分析指数走势、领涨板块和资金流向。200字以内。",
            period.label()
        );

        let req = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(&prompt)],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(anyhow!("报告 API error ({}): {}", status, brief(&body)));
        }

        let response: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("报告响应解析失败: {} body: {}", e, brief(&body)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone())
            .ok_or_else(|| anyhow!("报告响应缺少 message 内容"))
    }
}

fn brief(body: &str) -> String {
    body.chars().take(200).collect()
}

/// 读-改-写合并：没有旧文档则按当天日期建档；
/// 只覆盖本时段条目，date 与其他时段条目一律保留。
pub fn merge_report(
    existing: Option<ReportDocument>,
    period: ReportPeriod,
    content: String,
    now: DateTime<Local>,
) -> ReportDocument {
    let mut doc = existing.unwrap_or_else(|| ReportDocument {
        date: now.format("%Y-%m-%d").to_string(),
        periods: BTreeMap::new(),
    });

    doc.periods.insert(
        period.label().to_string(),
        ReportEntry {
            title: format!("{}点评", period.label()),
            time: now.format("%H:%M").to_string(),
            content,
        },
    );

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 7, h, m, 0).unwrap()
    }

    #[test]
    fn test_merge_into_empty_creates_dated_document() {
        let doc = merge_report(None, ReportPeriod::Midday, "早盘震荡".to_string(), at(11, 30));
        assert_eq!(doc.date, "2026-08-07");
        let entry = &doc.periods["midday"];
        assert_eq!(entry.title, "midday点评");
        assert_eq!(entry.time, "11:30");
        assert_eq!(entry.content, "早盘震荡");
    }

    #[test]
    fn test_merge_preserves_other_periods_and_date() {
        let mut periods = BTreeMap::new();
        periods.insert(
            "close".to_string(),
            ReportEntry {
                title: "close点评".to_string(),
                time: "15:30".to_string(),
                content: "昨日收盘总结".to_string(),
            },
        );
        let prior = ReportDocument {
            // 前一交易日建档，date 不能被合并覆盖
            date: "2026-08-06".to_string(),
            periods,
        };

        let doc = merge_report(
            Some(prior),
            ReportPeriod::Midday,
            "今日午盘".to_string(),
            at(11, 30),
        );

        assert_eq!(doc.date, "2026-08-06");
        assert_eq!(doc.periods["close"].content, "昨日收盘总结");
        assert_eq!(doc.periods["midday"].content, "今日午盘");
    }

    #[test]
    fn test_merge_overwrites_own_period_only() {
        let first = merge_report(None, ReportPeriod::Close, "v1".to_string(), at(15, 30));
        let doc = merge_report(Some(first), ReportPeriod::Close, "v2".to_string(), at(15, 45));
        assert_eq!(doc.periods.len(), 1);
        assert_eq!(doc.periods["close"].content, "v2");
        assert_eq!(doc.periods["close"].time, "15:45");
    }
}
