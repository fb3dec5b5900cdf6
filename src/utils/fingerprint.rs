use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// 标题规范化：去首尾空白，内部连续空白折叠为单个空格。
/// 同一事件不同渠道的排版差异不应产生不同指纹。
pub fn normalize_title(title: &str) -> String {
    whitespace_re().replace_all(title.trim(), " ").to_string()
}

/// 新闻指纹：规范化标题 + 发布时间的 SHA-256（小写 hex）。
/// 重复采集同一事件得到相同 id，用于去重/幂等覆盖。
pub fn news_fingerprint(title: &str, publish_time: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_title(title).as_bytes());
    hasher.update(publish_time.as_bytes());
    hex::encode(hasher.finalize())
}
