use anyhow::anyhow;
use tracing::{info, warn};

use crate::market_data::*;
use crate::storage::*;

pub fn history_entry_name(symbol : &str, range : HistoryRange) -> String {
    format!("{}_{}", symbol.replace("/", "_"), range)
}

/// Orders points oldest first, drops non-finite closes and keeps the last quote of any repeated day.
pub fn normalize_points(mut points : Vec<PricePoint>) -> Vec<PricePoint> {
    points.retain(|p| p.close.is_finite());
    points.sort_by_key(|p| p.date);

    let mut deduplicated : Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduplicated.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => deduplicated.push(point)
        }
    }

    deduplicated
}

pub fn acquire_price_history(service : &mut impl MarketDataService,
                             symbol : &str,
                             range : HistoryRange) -> anyhow::Result<PriceHistory> {
    let points = normalize_points(service.get_daily_closes(symbol, range)?);
    if points.is_empty() {
        return Err(anyhow!("No price data returned for symbol '{}' over range {}", symbol, range));
    }

    info!("Retrieved {} daily closes for {} ({} to {})", points.len(), symbol,
        points[0].date, points[points.len() - 1].date);
    Ok(PriceHistory { symbol : String::from(symbol), range, points })
}

pub fn load_price_history(storage : &mut impl Storage, name : &str) -> anyhow::Result<PriceHistory> {
    let mut history = storage.load_price_history(name)?;
    history.points = normalize_points(history.points);
    if history.points.is_empty() {
        return Err(anyhow!("Stored price history '{}' has no usable closes", name));
    }

    info!("Loaded {} daily closes for {} from '{}'", history.points.len(), history.symbol, name);
    Ok(history)
}

/// Returns false, after logging a warning, when an explicitly requested symbol or range differs from a stored history.
pub fn history_matches_request(history : &PriceHistory, symbol : Option<&str>, range : Option<HistoryRange>) -> bool {
    let mut matches = true;
    if let Some(symbol) = symbol.filter(|&s| s != history.symbol) {
        warn!("Requested symbol {} ignored, stored history is for {}", symbol, history.symbol);
        matches = false;
    }
    if let Some(range) = range.filter(|&r| r != history.range) {
        warn!("Requested range {} ignored, stored history covers {}", range, history.range);
        matches = false;
    }

    matches
}

pub fn fetch_price_history(service : &mut impl MarketDataService,
                           storage : &mut impl Storage,
                           symbol : &str,
                           range : HistoryRange) -> anyhow::Result<String> {
    let history = acquire_price_history(service, symbol, range)?;

    let entry_name = history_entry_name(symbol, range);
    storage.save_price_history(&entry_name, &history)?;
    info!("Saved price history as '{}'", entry_name);

    Ok(entry_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::*;
    use mockall::{predicate::*};

    #[test]
    fn fetch_and_save_history() -> anyhow::Result<()> {
        let mut service = MockMarketDataService::new();
        let mut storage = MockStorage::new();

        service.expect_get_daily_closes()
            .with(eq("BTC-USD"), eq(HistoryRange::Year1))
            .times(1)
            .return_once(|_, _| Ok(build_points(30)));

        let expected_history = PriceHistory { symbol : String::from("BTC-USD"), range : HistoryRange::Year1, points : build_points(30) };
        storage.expect_save_price_history()
            .with(eq("BTC-USD_Year1"), eq(expected_history))
            .times(1)
            .return_once(|_, _| Ok(()));

        let entry_name = fetch_price_history(&mut service, &mut storage, "BTC-USD", HistoryRange::Year1)?;
        assert_eq!(entry_name, "BTC-USD_Year1");

        Ok(())
    }

    #[test]
    fn entry_name_replaces_slashes() {
        assert_eq!(history_entry_name("ETH/USD", HistoryRange::Month6), "ETH_USD_Month6");
    }

    #[test]
    fn acquired_history_is_sorted_and_deduplicated() -> anyhow::Result<()> {
        let mut service = MockMarketDataService::new();

        let mut points = build_points_offset(5, 5);
        points.extend(build_points(5));
        let mut repeated_day = points[0];
        repeated_day.close = 999.0;
        points.push(repeated_day);
        points.push(PricePoint { close : f32::NAN, ..build_points_offset(10, 1)[0] });
        service.expect_get_daily_closes()
            .return_once(move |_, _| Ok(points));

        let history = acquire_price_history(&mut service, "ETH-USD", HistoryRange::Month1)?;

        let mut expected_points = build_points(10);
        expected_points[5].close = 999.0;
        assert_eq!(history.points, expected_points);
        assert_eq!(history.symbol, "ETH-USD");
        assert_eq!(history.range, HistoryRange::Month1);

        Ok(())
    }

    #[test]
    fn empty_response_is_an_error() {
        let mut service = MockMarketDataService::new();
        let mut storage = MockStorage::new();

        service.expect_get_daily_closes()
            .return_once(|_, _| Ok(Vec::new()));
        storage.expect_save_price_history().never();

        let result = fetch_price_history(&mut service, &mut storage, "NOPE-USD", HistoryRange::Year1);
        assert!(result.is_err());
    }

    #[test]
    fn service_errors_are_propagated() {
        let mut service = MockMarketDataService::new();
        let mut storage = MockStorage::new();

        service.expect_get_daily_closes()
            .return_once(|_, _| Err(anyhow!("HTTP 404")));
        storage.expect_save_price_history().never();

        assert!(fetch_price_history(&mut service, &mut storage, "BTC-USD", HistoryRange::Year1).is_err());
    }

    #[test]
    fn loaded_history_is_sorted_and_deduplicated() -> anyhow::Result<()> {
        let mut storage = MockStorage::new();

        let mut points = build_points(10);
        points.reverse();
        let repeated_day = PricePoint { close : 555.0, ..points[0] };
        points.push(repeated_day);
        points.push(PricePoint { close : f32::INFINITY, ..build_points_offset(10, 1)[0] });
        let stored_history = PriceHistory { symbol : String::from("BTC-USD"), range : HistoryRange::Year1, points };
        storage.expect_load_price_history()
            .with(eq("BTC-USD_Year1"))
            .times(1)
            .return_once(move |_| Ok(stored_history));

        let history = load_price_history(&mut storage, "BTC-USD_Year1")?;

        let mut expected_points = build_points(10);
        expected_points[9].close = 555.0;
        assert_eq!(history.points, expected_points);
        assert_eq!(history.latest().map(|p| p.date), Some(expected_points[9].date));

        Ok(())
    }

    #[test]
    fn loaded_history_without_closes_is_an_error() {
        let mut storage = MockStorage::new();

        storage.expect_load_price_history()
            .return_once(|_| Ok(PriceHistory { symbol : String::from("BTC-USD"), range : HistoryRange::Year1, points : Vec::new() }));

        assert!(load_price_history(&mut storage, "BTC-USD_Year1").is_err());
    }

    #[test]
    fn mismatched_request_is_detected() {
        let history = build_history(5, "BTC-USD");

        assert!(history_matches_request(&history, None, None));
        assert!(history_matches_request(&history, Some("BTC-USD"), Some(history.range)));
        assert!(!history_matches_request(&history, Some("ETH-USD"), None));
        assert!(!history_matches_request(&history, None, Some(HistoryRange::Max)));
    }
}
