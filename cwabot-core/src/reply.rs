//! One-shot reply policy: inbound text in, exactly one reply out.
//!
//! No state survives between messages; concurrent messages only share the
//! read-only catalog and the fetcher's HTTP client.

use tracing::debug;

use crate::catalog;
use crate::fetcher::ForecastSource;
use crate::format::{self, CardDocument};
use crate::model::ForecastError;

/// The command keyword an inbound message must start with.
pub const COMMAND_KEYWORD: &str = "天氣";

/// What the bot answers with. The transport layer decides how to deliver
/// each shape; the policy guarantees there is exactly one per message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Card(CardDocument),
}

#[derive(Debug)]
pub struct ReplyPolicy {
    source: Box<dyn ForecastSource>,
}

impl ReplyPolicy {
    pub fn new(source: Box<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Run one inbound message through parse → validate → fetch → format.
    ///
    /// Missing keyword and empty city are routed to help replies without
    /// touching the fetcher; fetch failures become their user-facing text.
    pub async fn handle_message(&self, text: &str) -> Reply {
        let trimmed = text.trim();

        let Some(rest) = trimmed.strip_prefix(COMMAND_KEYWORD) else {
            debug!("message without command keyword, sending help");
            return Reply::Text(help_message());
        };

        let city_input = rest.trim();
        if city_input.is_empty() {
            return Reply::Text(missing_city_message());
        }

        let location = catalog::normalize(city_input);

        match self.source.fetch(&location).await {
            Ok(forecast) => {
                // card first, plain text only when the card cannot be built
                match format::to_flex_card(&forecast) {
                    Some(card) => Reply::Card(card),
                    None => Reply::Text(format::to_plain_text(&forecast)),
                }
            }
            Err(err) => {
                debug!(%location, %err, "fetch failed, sending error text");
                Reply::Text(error_message(&err, city_input))
            }
        }
    }
}

fn help_message() -> String {
    format!("請輸入「{COMMAND_KEYWORD} 城市名稱」\n\n{}", catalog::format_supported_list())
}

fn missing_city_message() -> String {
    format!("請輸入城市名稱\n\n{}", catalog::format_supported_list())
}

/// Map a fetch failure to its user-facing message. `city_input` is the user's
/// text before normalization, so the "not found" reply echoes what they typed.
fn error_message(err: &ForecastError, city_input: &str) -> String {
    match err {
        ForecastError::ApiKeyMissing => {
            "⚠️ 中央氣象署 API 金鑰未設定，請檢查 .env 檔案".to_string()
        }
        ForecastError::UnsupportedLocation(_) => {
            format!(
                "❌ 找不到「{city_input}」的天氣資料\n\n{}",
                catalog::format_supported_list()
            )
        }
        ForecastError::Transport(status) => format!("⚠️ API 請求失敗 (HTTP {status})"),
        ForecastError::Timeout => "⏱️ 查詢逾時，請稍後再試".to_string(),
        ForecastError::Network(detail) => format!("❌ 網路錯誤: {detail}"),
        ForecastError::Parse(_) => "❌ 資料解析錯誤，請確認 API 回應格式".to_string(),
    }
}
