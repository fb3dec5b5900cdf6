use anyhow::Result;
use serde_json::Value;

use crate::models::news::RawNewsItem;

/// 拉取财联社电报快讯原始行（按接口返回顺序，最新在前）。
/// 字段缺失留空，由加工管道统一回退；广告条目直接跳过。
/// 整个请求失败向上返回错误，本轮不产出任何快照。
pub async fn fetch_telegraph(client: &reqwest::Client, count: u32) -> Result<Vec<RawNewsItem>> {
    let url = format!(
        "https://www.cls.cn/nodeapi/telegraphList?app=CailianpressWeb&os=web&sv=8.4.6&rn={}",
        count
    );

    let resp = client.get(&url).send().await?;
    let json: Value = resp.json().await?;

    let mut items = Vec::new();
    if let Some(roll_data) = json["data"]["roll_data"].as_array() {
        for item in roll_data {
            // 跳过广告
            if item["is_ad"].as_i64().unwrap_or(0) == 1 {
                continue;
            }

            let title = item["title"].as_str().unwrap_or("").to_string();
            let content = item["content"]
                .as_str()
                .or_else(|| item["brief"].as_str())
                .unwrap_or("")
                .to_string();
            let ctime = item["ctime"].as_i64().unwrap_or(0);
            let publish_time = if ctime > 0 {
                format_cst(ctime)
            } else {
                String::new()
            };

            items.push(RawNewsItem {
                title,
                content,
                publish_time,
            });
        }
    }

    Ok(items)
}

/// 秒级时间戳 -> 东八区 "YYYY-MM-DD HH:MM:SS"
fn format_cst(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| {
            dt.with_timezone(&chrono::FixedOffset::east_opt(8 * 3600).unwrap())
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cst() {
        // 2026-08-07 02:30:00 UTC = 10:30:00 东八区
        assert_eq!(format_cst(1786069800), "2026-08-07 10:30:00");
    }
}
