//! Turns a [`Forecast`] into the two reply shapes: a multi-line plain-text
//! report and a flex-card document for clients that render rich messages.
//!
//! Both shapes read the same derived [`PeriodForecast`] values, so they can
//! never disagree about weather, temperature or rain probability.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::{Value, json};

use crate::model::{Forecast, Period, PeriodForecast, RainTier};

/// A rich-card message: the platform's flex JSON plus the alt text shown by
/// clients that cannot render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    pub alt_text: String,
    pub contents: Value,
}

/// Undecorated fields for one window, as extracted from the provider record.
#[derive(Debug, Clone)]
pub struct RawPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub weather: String,
    pub comfort: String,
    pub min_temp: i32,
    pub max_temp: i32,
    pub rain_pop: u8,
}

/// Classify a window's start time into its day period.
pub fn period_label(start: NaiveDateTime) -> Period {
    Period::from_hour(start.hour())
}

/// Derive the display form of one window.
///
/// The single source of truth for the period label, its emoji and the 明天
/// qualifier: the 36-hour outlook can roll into the following day, so the
/// third window gets the prefix when it lands in a morning slot.
pub fn derive_period(index: usize, raw: RawPeriod) -> PeriodForecast {
    let period = period_label(raw.start);

    let label = if index == 2 && period == Period::Morning {
        format!("明天{}", period.label())
    } else {
        period.label().to_string()
    };

    PeriodForecast {
        period,
        label,
        start: raw.start,
        end: raw.end,
        weather: raw.weather,
        comfort: raw.comfort,
        min_temp: raw.min_temp,
        max_temp: raw.max_temp,
        rain_pop: raw.rain_pop,
    }
}

/// Render the plain-text report.
pub fn to_plain_text(forecast: &Forecast) -> String {
    let mut lines = vec![format!("📍 {} 36 小時天氣預報", forecast.location_name)];

    for p in &forecast.periods {
        lines.push(String::new());
        lines.push(format!(
            "{} {}（{} ~ {}）",
            p.period.emoji(),
            p.label,
            p.start.format("%m-%d %H:%M"),
            p.end.format("%H:%M"),
        ));
        lines.push(format!("☁️ {}，{}", p.weather, p.comfort));
        lines.push(format!("🌡️ 溫度：{}°C ~ {}°C", p.min_temp, p.max_temp));
        lines.push(format!("💧 降雨機率：{}%", p.rain_pop));
    }

    lines.join("\n")
}

/// Build the flex-card document, or `None` when there is nothing to render.
pub fn to_flex_card(forecast: &Forecast) -> Option<CardDocument> {
    if forecast.periods.is_empty() {
        return None;
    }

    let mut contents = vec![
        json!({
            "type": "box",
            "layout": "vertical",
            "contents": [
                {
                    "type": "text",
                    "text": format!("🌤️ {}天氣", forecast.location_name),
                    "weight": "bold",
                    "size": "xl",
                    "color": "#2C3E50"
                },
                {
                    "type": "text",
                    "text": "36 小時預報",
                    "size": "xs",
                    "color": "#95A5A6",
                    "margin": "xs"
                }
            ],
            "paddingBottom": "15px"
        }),
        json!({ "type": "separator" }),
    ];

    contents.extend(forecast.periods.iter().map(period_card));

    Some(CardDocument {
        alt_text: format!("🌤️ {} 36 小時天氣預報", forecast.location_name),
        contents: json!({
            "type": "bubble",
            "size": "mega",
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": contents,
                "paddingAll": "20px"
            },
            "styles": {
                "body": { "backgroundColor": "#FFFFFF" }
            }
        }),
    })
}

fn period_card(p: &PeriodForecast) -> Value {
    let rain_color = RainTier::from_pop(p.rain_pop).color();
    let time_range =
        format!("{} - {}", p.start.format("%m-%d %H:%M"), p.end.format("%m-%d %H:%M"));

    json!({
        "type": "box",
        "layout": "vertical",
        "contents": [
            {
                "type": "box",
                "layout": "horizontal",
                "contents": [
                    {
                        "type": "text",
                        "text": p.period.emoji(),
                        "size": "lg",
                        "flex": 0,
                        "margin": "none"
                    },
                    {
                        "type": "box",
                        "layout": "vertical",
                        "contents": [
                            {
                                "type": "text",
                                "text": &p.label,
                                "weight": "bold",
                                "size": "md",
                                "color": "#2C3E50"
                            },
                            {
                                "type": "text",
                                "text": time_range,
                                "size": "xxs",
                                "color": "#95A5A6"
                            }
                        ],
                        "margin": "md"
                    }
                ]
            },
            {
                "type": "separator",
                "margin": "md"
            },
            {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    {
                        "type": "text",
                        "text": &p.weather,
                        "size": "md",
                        "color": "#34495E",
                        "weight": "bold",
                        "wrap": true
                    },
                    {
                        "type": "text",
                        "text": &p.comfort,
                        "size": "sm",
                        "color": "#7F8C8D",
                        "margin": "xs",
                        "wrap": true
                    }
                ],
                "margin": "md"
            },
            {
                "type": "box",
                "layout": "horizontal",
                "contents": [
                    {
                        "type": "box",
                        "layout": "baseline",
                        "contents": [
                            { "type": "text", "text": "🌡️", "size": "md", "flex": 0 },
                            {
                                "type": "text",
                                "text": format!("{}° - {}°", p.min_temp, p.max_temp),
                                "size": "md",
                                "weight": "bold",
                                "color": "#FF6B35",
                                "margin": "sm",
                                "flex": 0
                            }
                        ],
                        "flex": 1
                    },
                    {
                        "type": "box",
                        "layout": "baseline",
                        "contents": [
                            { "type": "text", "text": "💧", "size": "md", "flex": 0 },
                            {
                                "type": "text",
                                "text": format!("{}%", p.rain_pop),
                                "size": "md",
                                "weight": "bold",
                                "color": rain_color,
                                "margin": "sm",
                                "flex": 0
                            }
                        ],
                        "flex": 1
                    }
                ],
                "margin": "md",
                "spacing": "md"
            }
        ],
        "backgroundColor": "#FAFAFA",
        "cornerRadius": "10px",
        "paddingAll": "15px",
        "margin": "md"
    })
}
