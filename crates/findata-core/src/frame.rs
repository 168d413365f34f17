//! Conversion of price records into a polars [`DataFrame`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::{
    error::{DataError, Result},
    types::Price,
};

/// Converts prices into a DataFrame sorted by date.
///
/// Columns: `date` (millisecond datetime), `open`, `close`, `high`, `low`, `volume`.
pub fn prices_to_df(prices: &[Price]) -> Result<DataFrame> {
    let timestamps = prices
        .iter()
        .map(|p| parse_timestamp(&p.time))
        .collect::<Result<Vec<i64>>>()?;
    let opens: Vec<f64> = prices.iter().map(|p| p.open).collect();
    let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
    let highs: Vec<f64> = prices.iter().map(|p| p.high).collect();
    let lows: Vec<f64> = prices.iter().map(|p| p.low).collect();
    let volumes: Vec<i64> = prices.iter().map(|p| p.volume).collect();

    let df = DataFrame::new(vec![
        Column::new("date".into(), timestamps),
        Column::new("open".into(), opens),
        Column::new("close".into(), closes),
        Column::new("high".into(), highs),
        Column::new("low".into(), lows),
        Column::new("volume".into(), volumes),
    ])
    .map_err(|e| DataError::Parse(e.to_string()))?;

    df.lazy()
        .with_column(col("date").cast(DataType::Datetime(TimeUnit::Milliseconds, None)))
        .sort(["date"], Default::default())
        .collect()
        .map_err(|e| DataError::Parse(e.to_string()))
}

/// Parses an API timestamp into milliseconds since the Unix epoch (UTC).
fn parse_timestamp(value: &str) -> Result<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis())
        .map_err(|e| DataError::Parse(format!("invalid price time {value:?}: {e}")))
}
