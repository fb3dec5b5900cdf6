use chrono::Local;

use crate::models::ai::Classification;
use crate::models::news::{NewsRecord, RawNewsItem};
use crate::services::classifier::NewsClassifier;
use crate::utils::fingerprint::news_fingerprint;

const NEWS_SOURCE: &str = "财联社";
/// 无标题快讯用内容前缀顶替的截断长度（字符数）
const TITLE_FALLBACK_CHARS: usize = 30;

/// 把原始快讯批量加工成稳定身份 + AI 标注的新闻记录。
/// 只取前 limit 条（控制分类调用量），保持输入顺序（最新在前）；
/// 单条分类失败不丢记录，分类器内部已兜底为中性三元组。
pub async fn enrich(
    raw: &[RawNewsItem],
    limit: usize,
    classifier: &NewsClassifier,
) -> Vec<NewsRecord> {
    let mut records = Vec::with_capacity(limit.min(raw.len()));

    for item in raw.iter().take(limit) {
        let (title, publish_time, id) = normalize_row(item);
        let Classification {
            industry,
            score,
            reason,
        } = classifier.classify(&title, &item.content).await;

        records.push(NewsRecord {
            id,
            title,
            content: item.content.clone(),
            source: NEWS_SOURCE.to_string(),
            publish_time,
            industry,
            score,
            ai_reason: reason,
        });
    }

    records
}

/// 行规范化：标题回退（内容前缀）、发布时间回退（当前时刻，与源格式一致）、
/// 指纹计算。与网络无关，单独可测。
fn normalize_row(item: &RawNewsItem) -> (String, String, String) {
    let title = if item.title.is_empty() {
        item.content.chars().take(TITLE_FALLBACK_CHARS).collect()
    } else {
        item.title.clone()
    };

    let publish_time = if item.publish_time.is_empty() {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        item.publish_time.clone()
    };

    let id = news_fingerprint(&title, &publish_time);
    (title, publish_time, id)
}
