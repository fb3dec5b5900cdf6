use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::models::sentiment::{IndexQuote, InstrumentQuote};
use crate::utils::http::build_market_client;

/// 指数 secid：上证指数 / 创业板指
const INDEX_SECIDS: &str = "1.000001,0.399006";

/// 全市场行情源：东方财富 push2 接口，沪深A股全量快照 + 指数行情。
/// 接口视为不可靠且字段松散，缺字段的行直接丢弃或给默认值。
pub struct MarketDataService {
    client: reqwest::Client,
    ut_token: String,
}

impl MarketDataService {
    pub fn new(ut_token: &str) -> Result<Self> {
        let client = build_market_client()?;
        Ok(Self {
            client,
            ut_token: ut_token.to_string(),
        })
    }

    /// 拉取沪深A股全量行情（主板+创业板，不含科创板/北交所）。
    /// 字段映射：f2=最新价, f3=涨跌幅, f6=成交额, f12=代码, f14=名称
    /// 分页拉取，每页5000条。
    pub async fn fetch_spot_table(&self) -> Result<Vec<InstrumentQuote>> {
        let mut all_quotes = Vec::new();
        let mut page = 1;

        loop {
            let quotes = self.fetch_page(page).await?;
            if quotes.is_empty() {
                break;
            }
            let count = quotes.len();
            all_quotes.extend(quotes);
            if count < 5000 {
                break;
            }
            page += 1;
        }

        Ok(all_quotes)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<InstrumentQuote>> {
        // fs 参数: m:0 t:6 (深市主板) + m:0 t:80 (创业板) + m:1 t:2 (沪市主板)
        let fs = "m:0+t:6,m:0+t:80,m:1+t:2";
        let fields = "f2,f3,f6,f12,f14";

        let url = format!(
            "https://push2.eastmoney.com/api/qt/clist/get?pn={}&pz=5000&po=1&np=1&ut={}&fltt=2&invt=2&fid=f3&fs={}&fields={}",
            page, self.ut_token, fs, fields
        );

        let resp = self.client.get(&url).send().await?;
        let text = resp.text().await?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|e| anyhow!("东方财富数据解析失败: {}", e))?;

        let data = json
            .get("data")
            .ok_or_else(|| anyhow!("响应缺少 data 字段"))?;
        let items = match data.get("diff").and_then(|d| d.as_array()) {
            Some(arr) => arr,
            None => return Ok(vec![]),
        };

        let mut quotes = Vec::with_capacity(items.len());
        for item in items {
            if let Some(quote) = parse_spot_item(item) {
                quotes.push(quote);
            }
        }

        Ok(quotes)
    }

    /// 指数行情（上证指数/创业板指）。请求或解析失败返回 Err，
    /// 调用方降级为空指数列表，不影响情绪快照的其余部分。
    pub async fn fetch_index_quotes(&self) -> Result<Vec<IndexQuote>> {
        let url = format!(
            "https://push2.eastmoney.com/api/qt/ulist.np/get?fltt=2&invt=2&ut={}&fields=f2,f3,f14&secids={}",
            self.ut_token, INDEX_SECIDS
        );

        let resp = self.client.get(&url).send().await?;
        let json: Value = resp.json().await?;

        let mut indices = Vec::new();
        if let Some(items) = json["data"]["diff"].as_array() {
            for item in items {
                // 非交易日或接口异常时价格字段可能为 "-"，该指数直接略过
                let (Some(price), Some(change)) =
                    (item["f2"].as_f64(), item["f3"].as_f64())
                else {
                    continue;
                };
                let name = item["f14"].as_str().unwrap_or("").to_string();
                indices.push(IndexQuote {
                    name,
                    price,
                    change,
                });
            }
        }

        Ok(indices)
    }
}

/// 单行解析。停牌股票的价格/涨跌幅返回 "-"（非数字），整行丢弃，
/// 不参与涨跌家数统计。
fn parse_spot_item(item: &Value) -> Option<InstrumentQuote> {
    let price = item.get("f2")?.as_f64()?;
    let change_pct = item.get("f3")?.as_f64()?;
    let amount = item.get("f6").and_then(|v| v.as_f64()).unwrap_or(0.0);
    let code = item.get("f12").and_then(|v| v.as_str()).unwrap_or("").to_string();
    let name = item.get("f14").and_then(|v| v.as_str()).unwrap_or("").to_string();

    Some(InstrumentQuote {
        code,
        name,
        price,
        change_pct,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spot_item_normal() {
        let item: Value = serde_json::json!({
            "f2": 12.34, "f3": 5.67, "f6": 123456789.0,
            "f12": "600519", "f14": "贵州茅台"
        });
        let quote = parse_spot_item(&item).unwrap();
        assert_eq!(quote.code, "600519");
        assert_eq!(quote.name, "贵州茅台");
        assert_eq!(quote.price, 12.34);
        assert_eq!(quote.change_pct, 5.67);
        assert_eq!(quote.amount, 123456789.0);
    }

    #[test]
    fn test_parse_spot_item_suspended_dropped() {
        // 停牌：涨跌幅为 "-"
        let item: Value = serde_json::json!({
            "f2": "-", "f3": "-", "f6": "-",
            "f12": "600000", "f14": "某股票"
        });
        assert!(parse_spot_item(&item).is_none());
    }

    #[test]
    fn test_parse_spot_item_missing_amount_defaults_zero() {
        let item: Value = serde_json::json!({
            "f2": 10.0, "f3": -2.0, "f12": "000001", "f14": "平安银行"
        });
        let quote = parse_spot_item(&item).unwrap();
        assert_eq!(quote.amount, 0.0);
    }
}
