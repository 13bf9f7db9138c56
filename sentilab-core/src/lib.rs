//! SentiLab Core — domain types, data acquisition, sentiment scoring, feature engineering.
//!
//! This crate contains the data layer of the pipeline:
//! - Domain types (price bars, news items, sentiment records, daily feature rows)
//! - Market data providers (Yahoo Finance, synthetic random walk) with
//!   construction-time strategy selection and silent-schema fallback
//! - News providers (NewsAPI, synthetic headline generator)
//! - Sentiment scorers (finance lexicon, remote text-analysis service)
//! - Feature engineering: calendar alignment, returns, sentiment aggregates,
//!   relative performance

pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod news;
pub mod seeds;
pub mod sentiment;
