use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::models::ai::{Classification, GenerateRequest, GenerateResponse};
use crate::models::config::ClassifierConfig;
use crate::utils::http::build_ai_client;

/// 分类失败时的兜底行业标签（宁可中性降级也不丢新闻）
const FALLBACK_INDUSTRY: &str = "未分类";
/// 字段缺失时的默认行业
const DEFAULT_INDUSTRY: &str = "综合";
const FALLBACK_SCORE: i64 = 50;
const REASON_SERVICE_DOWN: &str = "AI 分析服务暂时不可用";
const REASON_PARSE_FAILED: &str = "解析结果失败";

/// 分类 prompt 里内容的截断长度（字符数）
const CONTENT_BRIEF_CHARS: usize = 500;

/// 新闻行业/重要性分类器：委托本地 Ollama 模型，永不向外抛错。
/// 单次调用不重试：分类服务慢或不可用时降级为中性结果，
/// 不能阻塞整条管道。
pub struct NewsClassifier {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl NewsClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        Ok(Self {
            client: build_ai_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// 分析一条新闻，返回 (行业, 重要性评分, 理由)。
    /// 网络错误、非 2xx、响应非 JSON、score 非整数等所有失败路径
    /// 都折算成固定兜底值。
    pub async fn classify(&self, title: &str, content: &str) -> Classification {
        let prompt = build_prompt(title, content);
        match self.call_generate(&prompt).await {
            Ok(text) => parse_classification(&text),
            Err(e) => {
                log::error!("AI 分析失败: {}", e);
                Classification {
                    industry: FALLBACK_INDUSTRY.to_string(),
                    score: FALLBACK_SCORE,
                    reason: REASON_SERVICE_DOWN.to_string(),
                }
            }
        }
    }

    async fn call_generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let req = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: "json".to_string(),
        };

        let resp = self.client.post(&url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("Ollama API error: {}", status));
        }

        let body: GenerateResponse = resp.json().await?;
        Ok(body.response)
    }
}

fn build_prompt(title: &str, content: &str) -> String {
    let brief: String = content.chars().take(CONTENT_BRIEF_CHARS).collect();
    format!(
        "你是一个金融新闻分析师。请分析以下新闻：\n\
        标题：{}\n\
        内容：{}\n\
        \n\
        任务：\n\
        1. 判断所属的申万行业（如：食品饮料-白酒，电子-半导体，宏观-货币政策）。\n\
        2. 给出重要性评分（0-100），0为无关噪音，100为重磅利好/利空。\n\
        3. 用一句话简述理由（30字以内）。\n\
        \n\
        请严格且只返回 JSON 格式，不要包含 markdown 标记：\n\
        {{\n\
          \"industry\": \"行业名称\",\n\
          \"score\": 85,\n\
          \"reason\": \"理由...\"\n\
        }}",
        title, brief
    )
}

/// 防御式解析模型输出：合法 JSON 缺字段按字段给默认值，
/// 非 JSON 或 score 无法转整数则整体兜底。
fn parse_classification(text: &str) -> Classification {
    let json: Value = match serde_json::from_str(strip_code_fence(text)) {
        Ok(v) => v,
        Err(_) => return parse_failed(),
    };

    let industry = json
        .get("industry")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_INDUSTRY)
        .to_string();

    let score = match json.get("score") {
        None | Some(Value::Null) => FALLBACK_SCORE,
        Some(v) => match coerce_score(v) {
            Some(s) => s.clamp(0, 100),
            None => return parse_failed(),
        },
    };

    let reason = json
        .get("reason")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Classification { industry, score, reason }
}

fn parse_failed() -> Classification {
    Classification {
        industry: FALLBACK_INDUSTRY.to_string(),
        score: FALLBACK_SCORE,
        reason: REASON_PARSE_FAILED.to_string(),
    }
}

/// 模型偶尔无视指令包一层 markdown 代码块，剥掉再解析
fn strip_code_fence(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

fn coerce_score(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    if let Some(f) = v.as_f64() {
        return Some(f as i64);
    }
    if let Some(s) = v.as_str() {
        return s.trim().parse::<f64>().ok().map(|f| f as i64);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let c = parse_classification(r#"{"industry":"电子-半导体","score":85,"reason":"龙头扩产"}"#);
        assert_eq!(c.industry, "电子-半导体");
        assert_eq!(c.score, 85);
        assert_eq!(c.reason, "龙头扩产");
    }

    #[test]
    fn test_parse_empty_string_falls_back() {
        let c = parse_classification("");
        assert_eq!(c.industry, "未分类");
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "解析结果失败");
    }

    #[test]
    fn test_parse_empty_object_uses_field_defaults() {
        // 合法 JSON 但三个字段都缺：按字段默认，不算解析失败
        let c = parse_classification("{}");
        assert_eq!(c.industry, "综合");
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "");
    }

    #[test]
    fn test_parse_non_json_falls_back() {
        let c = parse_classification("抱歉，我无法完成该任务");
        assert_eq!(c.industry, "未分类");
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "解析结果失败");
    }

    #[test]
    fn test_parse_score_not_coercible_falls_back() {
        let c = parse_classification(r#"{"industry":"宏观","score":"很高","reason":"x"}"#);
        assert_eq!(c.industry, "未分类");
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "解析结果失败");
    }

    #[test]
    fn test_parse_score_from_string_and_float() {
        assert_eq!(parse_classification(r#"{"score":"85"}"#).score, 85);
        assert_eq!(parse_classification(r#"{"score":85.7}"#).score, 85);
    }

    #[test]
    fn test_parse_score_clamped_to_range() {
        assert_eq!(parse_classification(r#"{"score":150}"#).score, 100);
        assert_eq!(parse_classification(r#"{"score":-10}"#).score, 0);
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let c = parse_classification("```json\n{\"industry\":\"银行\",\"score\":60,\"reason\":\"利好\"}\n```");
        assert_eq!(c.industry, "银行");
        assert_eq!(c.score, 60);
    }

    #[test]
    fn test_prompt_truncates_long_content() {
        let long: String = "涨".repeat(2000);
        let prompt = build_prompt("标题", &long);
        assert!(prompt.chars().count() < 1000);
    }
}
