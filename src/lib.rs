pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use std::time::Duration;

use anyhow::Result;
use chrono::Local;

use models::config::AppConfig;
use models::news::NewsRecord;
use models::report::ReportDocument;
use models::sentiment::{IndexQuote, SentimentSnapshot, SentimentStats};
use services::classifier::NewsClassifier;
use services::market_data::MarketDataService;
use services::report::{merge_report, ReportPeriod, ReportService};
use services::scheduler::{market_status, Schedule, TaskId};
use services::{enrich, news_feed, sentiment};
use store::snapshot::SnapshotStore;

pub const NEWS_FILE: &str = "news_data.json";
pub const SENTIMENT_FILE: &str = "market_sentiment.json";
pub const REPORTS_FILE: &str = "market_reports.json";

/// 管道上下文：启动时构建一次，所有定时任务共用。
/// 周期之间不保留任何内存状态，跨周期记忆只有落盘的快照文件。
pub struct Pipeline {
    config: AppConfig,
    store: SnapshotStore,
    market: MarketDataService,
    news_client: reqwest::Client,
    classifier: NewsClassifier,
    reporter: Option<ReportService>,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = SnapshotStore::new(&config.data_dir)?;
        let market = MarketDataService::new(&config.market_token)?;
        let news_client = utils::http::build_cls_client()?;
        let classifier = NewsClassifier::new(&config.classifier)?;
        let reporter = ReportService::from_config(&config.report)?;

        Ok(Self {
            config,
            store,
            market,
            news_client,
            classifier,
            reporter,
        })
    }

    /// 抓取并加工新闻快照。抓取失败整轮放弃，保留上一份快照
    /// （陈旧但完整的数据优于清空）。
    pub async fn run_news_task(&self) -> Result<()> {
        log::info!("开始抓取财联社新闻...");
        let raw =
            news_feed::fetch_telegraph(&self.news_client, self.config.news_limit as u32).await?;
        let records: Vec<NewsRecord> =
            enrich::enrich(&raw, self.config.news_limit, &self.classifier).await;
        self.store.save(NEWS_FILE, &records)
    }

    /// 计算并落盘市场情绪快照。行情拉取失败降级为中性默认值仍然落盘，
    /// 指数行情失败降级为空列表。
    pub async fn run_sentiment_task(&self) -> Result<()> {
        let now = Local::now();
        log::info!("正在计算A股情绪... 当前阶段: {}", market_status(now));

        let overview = match self.market.fetch_spot_table().await {
            Ok(table) => Some(sentiment::reduce(&table)),
            Err(e) => {
                log::error!("获取市场数据失败: {}", e);
                None
            }
        };

        let (score, stats) = match &overview {
            Some(o) => (
                sentiment::sentiment_score(o),
                SentimentStats {
                    up: o.up_count,
                    down: o.down_count,
                    limit_up: o.limit_up,
                    limit_down: o.limit_down,
                },
            ),
            None => (
                50.0,
                SentimentStats {
                    up: 0,
                    down: 0,
                    limit_up: 0,
                    limit_down: 0,
                },
            ),
        };

        let indices: Vec<IndexQuote> = match self.market.fetch_index_quotes().await {
            Ok(list) => list,
            Err(e) => {
                log::warn!("指数行情获取失败: {}", e);
                Vec::new()
            }
        };

        let snapshot = SentimentSnapshot {
            updated_at: now.format("%H:%M").to_string(),
            score,
            level: sentiment::level(score),
            stats,
            indices,
        };
        self.store.save(SENTIMENT_FILE, &snapshot)
    }

    /// 生成并合并时段复盘报告。生成失败不动旧文档；未配置 key 则跳过。
    pub async fn run_report_task(&self, period: ReportPeriod) -> Result<()> {
        let Some(reporter) = &self.reporter else {
            log::warn!("未配置 DeepSeek Key，跳过报告生成");
            return Ok(());
        };

        log::info!("正在生成 {} 报告...", period.label());
        let content = reporter.generate(period).await?;

        let existing: Option<ReportDocument> = self.store.load(REPORTS_FILE)?;
        let doc = merge_report(existing, period, content, Local::now());
        self.store.save(REPORTS_FILE, &doc)
    }

    /// 执行单个任务并吞掉错误：任何任务失败只记日志，
    /// 不影响其他任务的下一次到期执行。
    pub async fn execute(&self, task: TaskId) {
        let result = match task {
            TaskId::FetchNews => self.run_news_task().await,
            TaskId::Sentiment => self.run_sentiment_task().await,
            TaskId::Report(period) => self.run_report_task(period).await,
        };

        if let Err(e) = result {
            match task {
                TaskId::FetchNews => log::error!("新闻抓取失败: {}", e),
                TaskId::Sentiment => log::error!("情绪计算失败: {}", e),
                TaskId::Report(period) => log::error!("{} 报告生成失败: {}", period.label(), e),
            }
        }
    }
}

/// 主循环：启动先各跑一轮新闻+情绪，之后每秒轮询任务表，
/// 串行执行到期任务。循环本身永不退出。
pub async fn run(config: AppConfig) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let mut schedule = Schedule::standard(Local::now());

    // 启动时立即执行一次
    pipeline.execute(TaskId::FetchNews).await;
    pipeline.execute(TaskId::Sentiment).await;

    log::info!("后端服务启动成功，开始定时任务监控...");
    loop {
        for task in schedule.due(Local::now()) {
            pipeline.execute(task).await;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
