//! Synthetic price-bar generator.
//!
//! Produces a seeded random-walk price path covering every weekday in the
//! requested range, with volume drawn from a fixed plausible range. Same
//! schema as real data; the only difference visible to a consumer is the
//! `DataSourceMode::Synthetic` tag.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

use super::provider::{FetchedBars, MarketDataProvider};
use crate::domain::{DataSourceMode, PriceBar};
use crate::error::DataError;
use crate::seeds::SeedForge;

/// Synthetic random-walk provider. Seeded per symbol, so the same
/// `(master_seed, symbol, range)` always yields the same series.
pub struct SyntheticMarketProvider {
    seeds: SeedForge,
}

impl SyntheticMarketProvider {
    pub fn new(seeds: SeedForge) -> Self {
        Self { seeds }
    }
}

impl MarketDataProvider for SyntheticMarketProvider {
    fn name(&self) -> &str {
        "synthetic_walk"
    }

    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Synthetic
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedBars, DataError> {
        let bars = generate_walk(&self.seeds, symbol, start, end);
        Ok(FetchedBars {
            symbol: symbol.to_string(),
            bars,
            mode: DataSourceMode::Synthetic,
        })
    }
}

/// Generate a random-walk series for every weekday in [start, end].
///
/// Daily moves are uniform in ±3%, intrabar range extends up to 1% beyond
/// the open/close span, keeping high >= max(open, close) >= min(open, close)
/// >= low.
pub fn generate_walk(
    seeds: &SeedForge,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PriceBar> {
    let mut rng = seeds.rng_for("price_walk", symbol);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == Weekday::Sat || weekday == Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_move: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_move);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(PriceBar {
            date: current,
            symbol: symbol.to_string(),
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn covers_every_weekday_in_range() {
        let seeds = SeedForge::new(42);
        // 2022-01-01 is a Saturday; Jan 3-7 and Jan 10 are the weekdays
        let bars = generate_walk(&seeds, "THYAO.IS", d("2022-01-01"), d("2022-01-10"));
        assert_eq!(bars.len(), 6);
        assert_eq!(bars[0].date, d("2022-01-03"));
        assert_eq!(bars.last().unwrap().date, d("2022-01-10"));
        for bar in &bars {
            let wd = bar.date.weekday();
            assert!(wd != Weekday::Sat && wd != Weekday::Sun);
        }
    }

    #[test]
    fn ohlc_is_internally_consistent() {
        let seeds = SeedForge::new(7);
        let bars = generate_walk(&seeds, "XU100.IS", d("2022-01-01"), d("2022-06-30"));
        for bar in &bars {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
            assert!(bar.low > 0.0);
            assert!((500_000..5_000_000).contains(&bar.volume));
        }
    }

    #[test]
    fn same_seed_same_series() {
        let a = generate_walk(&SeedForge::new(42), "THYAO.IS", d("2022-01-01"), d("2022-03-01"));
        let b = generate_walk(&SeedForge::new(42), "THYAO.IS", d("2022-01-01"), d("2022-03-01"));
        assert_eq!(a, b);
    }

    #[test]
    fn different_symbols_different_series() {
        let seeds = SeedForge::new(42);
        let a = generate_walk(&seeds, "THYAO.IS", d("2022-01-03"), d("2022-01-14"));
        let b = generate_walk(&seeds, "XU100.IS", d("2022-01-03"), d("2022-01-14"));
        assert_ne!(a[0].close, b[0].close);
    }

    #[test]
    fn empty_range_when_start_after_end() {
        let seeds = SeedForge::new(42);
        let bars = generate_walk(&seeds, "THYAO.IS", d("2022-01-10"), d("2022-01-03"));
        assert!(bars.is_empty());
    }
}
