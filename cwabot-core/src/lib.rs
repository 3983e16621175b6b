//! Core library for the CWA 36-hour forecast chat bot.
//!
//! This crate defines:
//! - The supported-city catalog and name normalization
//! - The forecast fetcher for the CWA open-data API
//! - Plain-text and flex-card formatting of a forecast
//! - The reply policy mapping one inbound message to one reply
//!
//! Webhook transport and message delivery stay outside: callers hand in the
//! message text and send whatever [`reply::Reply`] comes back.

pub mod catalog;
pub mod config;
pub mod fetcher;
pub mod format;
pub mod model;
pub mod reply;

pub use config::Config;
pub use fetcher::{CwaFetcher, ForecastSource};
pub use format::CardDocument;
pub use model::{Forecast, ForecastError, Period, PeriodForecast, RainTier};
pub use reply::{Reply, ReplyPolicy};
