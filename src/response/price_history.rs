use crate::serializers::string;
use crate::time::ServerTime;
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// The response from `/market/pricehistory/`.
#[derive(Debug, Deserialize, Clone)]
pub struct PriceHistory {
    #[serde(default)]
    pub success: bool,
    /// Currency symbol prefixing prices, e.g. `$`.
    #[serde(default)]
    pub price_prefix: String,
    /// Currency symbol following prices, e.g. `USD`.
    #[serde(default)]
    pub price_suffix: String,
    /// Median sale points, oldest first.
    #[serde(default, deserialize_with = "to_price_points")]
    pub prices: Vec<PricePoint>,
}

/// One point on a market price history graph. Recent points aggregate an
/// hour of sales, older ones a whole day.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Start of the period this point aggregates.
    pub date: ServerTime,
    /// Median sale price.
    pub price: f64,
    /// Number of items sold.
    pub volume: u32,
}

/// Each point arrives as `["Dec 10 2012 01: +0", 0.798, "46"]`.
fn to_price_points<'de, D>(deserializer: D) -> Result<Vec<PricePoint>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct RawPricePoint(
        String,
        f64,
        #[serde(with = "string")] u32,
    );

    let raw = Vec::<RawPricePoint>::deserialize(deserializer)?;

    raw.into_iter()
        .map(|RawPricePoint(raw_date, price, volume)| {
            let date = parse_point_date(&raw_date)
                .ok_or_else(|| de::Error::custom(format!("invalid price point date: {raw_date}")))?;

            Ok(PricePoint {
                date,
                price,
                volume,
            })
        })
        .collect()
}

fn parse_point_date(raw: &str) -> Option<ServerTime> {
    // "Dec 10 2012 01: +0" carries no minutes or timezone beyond the hour
    let raw = raw.split(':').next()?.trim();
    let (date, hour) = raw.rsplit_once(' ')?;
    let date = NaiveDate::parse_from_str(date, "%b %d %Y").ok()?;
    let hour = hour.parse().ok()?;

    Some(date.and_hms_opt(hour, 0, 0)?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price_history() {
        let history: PriceHistory = serde_json::from_str(include_str!("fixtures/price_history.json")).unwrap();

        assert!(history.success);
        assert_eq!(history.price_prefix, "$");
        assert_eq!(history.prices.len(), 3);

        let first = &history.prices[0];

        assert_eq!(first.price, 2.519);
        assert_eq!(first.volume, 46);
        assert_eq!(first.date.to_rfc3339(), "2023-03-01T01:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_dates() {
        let json = r#"{"success":true,"price_prefix":"$","price_suffix":"","prices":[["once upon a time",1.0,"2"]]}"#;

        assert!(serde_json::from_str::<PriceHistory>(json).is_err());
    }

    #[test]
    fn parses_point_dates() {
        let date = parse_point_date("Mar 01 2023 01: +0").unwrap();

        assert_eq!(date.to_rfc3339(), "2023-03-01T01:00:00+00:00");
    }
}
