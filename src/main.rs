use anyhow::Result;

use market_pulse::models::config::AppConfig;

fn preprocess() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    preprocess();

    let config = AppConfig::from_env();
    log::info!("输出目录: {}", config.data_dir.display());

    market_pulse::run(config).await
}
