use serde::{Deserialize, Serialize};

/// 新闻分类结果三元组（行业 / 重要性 / 理由）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub industry: String,
    pub score: i64,
    pub reason: String,
}

// ========== Ollama /api/generate（分类场景）==========

/// 分类请求：非流式 + 强制 JSON 输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

// ========== Chat Completion（报告场景）==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_wire_format() {
        let req = GenerateRequest {
            model: "qwen2.5:7b".to_string(),
            prompt: "分析新闻".to_string(),
            stream: false,
            format: "json".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"stream\":false"));
        assert!(json.contains("\"format\":\"json\""));
    }

    #[test]
    fn test_chat_message_user() {
        let msg = ChatMessage::user("写一份复盘报告");
        assert_eq!(msg.role, "user");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("写一份复盘报告"));
    }

    #[test]
    fn test_completion_response_missing_message() {
        // message 缺失时应能解析为 None，由调用方判定为生成失败
        let body = r#"{"id":"x","choices":[{"finish_reason":"stop"}]}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(resp.choices[0].message.is_none());
    }
}
