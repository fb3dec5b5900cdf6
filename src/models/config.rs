use std::env;
use std::path::PathBuf;

/// 东方财富 push2 接口的默认访问 token（ut 参数）
const DEFAULT_UT_TOKEN: &str = "bd1d9ddb04089700cf9c27f6f7426281";

/// 全局配置：进程启动时从环境变量构建一次，之后只读传引用。
/// 各组件不直接读环境变量。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 快照文件输出目录
    pub data_dir: PathBuf,
    /// 每轮加工的新闻条数上限（控制分类调用量，不是相关性过滤）
    pub news_limit: usize,
    /// 行情接口访问 token
    pub market_token: String,
    pub classifier: ClassifierConfig,
    pub report: ReportConfig,
}

/// 新闻分类服务（本地 Ollama）配置
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// 复盘报告服务（DeepSeek）配置
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// 未配置时跳过报告生成（告警，不报错）
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let classifier = ClassifierConfig {
            base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "qwen2.5:7b".to_string()),
            timeout_secs: 30,
        };

        let report = ReportConfig {
            api_key: env::var("DEEPSEEK_API_KEY").ok().filter(|s| !s.is_empty()),
            base_url: env::var("DEEPSEEK_BASE_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com".to_string()),
            model: "deepseek-chat".to_string(),
            timeout_secs: 60,
        };

        Self {
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string())),
            news_limit: env::var("NEWS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            market_token: env::var("EASTMONEY_UT_TOKEN")
                .unwrap_or_else(|_| DEFAULT_UT_TOKEN.to_string()),
            classifier,
            report,
        }
    }
}
