//! Temporal aggregation of transactions into monthly totals
//!
//! Every record is normalized to a (year, month) bucket keyed by [`MonthIndex`],
//! amounts are summed per bucket, and buckets come back in ascending order.
//!
//! Transaction stores emit dates in more than one shape. All of them are
//! normalized here, by [`parse_record_date`], and nowhere else:
//! - plain strings: `2024-01-15`, `2024-01-15T10:30:00Z`, `2024-01-15 10:30:00`, `01/15/2024`
//! - epoch milliseconds: `1705276800000`
//! - wrapped objects: `{"$date": "2024-01-15T00:00:00Z"}`, `{"$date": {"$numberLong": "1705276800000"}}`

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{MonthIndex, MonthlyAggregate, RawTransaction, Transaction};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Aggregate raw records into ascending monthly totals
///
/// Fails with [`Error::EmptyInput`] on an empty slice and with
/// [`Error::MissingField`] when any record lacks a parseable date or amount.
pub fn aggregate(records: &[RawTransaction]) -> Result<Vec<MonthlyAggregate>> {
    let transactions = validate_records(records)?;
    aggregate_transactions(&transactions)
}

/// Aggregate already-validated transactions into ascending monthly totals
pub fn aggregate_transactions(transactions: &[Transaction]) -> Result<Vec<MonthlyAggregate>> {
    if transactions.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut buckets: BTreeMap<MonthIndex, f64> = BTreeMap::new();
    for tx in transactions {
        *buckets.entry(MonthIndex::from_date(&tx.date)).or_insert(0.0) += tx.amount;
    }

    debug!(
        transactions = transactions.len(),
        months = buckets.len(),
        "Aggregated transactions into monthly totals"
    );

    Ok(buckets
        .into_iter()
        .map(|(month_index, total_amount)| MonthlyAggregate {
            month_index,
            total_amount,
        })
        .collect())
}

/// Validate raw records into typed transactions
pub fn validate_records(records: &[RawTransaction]) -> Result<Vec<Transaction>> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let date = record
                .date
                .as_ref()
                .and_then(parse_record_date)
                .ok_or_else(|| Error::MissingField(format!("date (record {})", i)))?;
            let amount = record
                .amount
                .as_ref()
                .and_then(parse_record_amount)
                .ok_or_else(|| Error::MissingField(format!("amount (record {})", i)))?;
            Ok(Transaction { date, amount })
        })
        .collect()
}

/// Normalize a plain or wrapped date value to a calendar date
///
/// Timestamps with an offset keep their local calendar date.
pub fn parse_record_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n.as_i64().and_then(date_from_millis),
        Value::Object(map) => {
            if let Some(inner) = map.get("$date") {
                return parse_record_date(inner);
            }
            map.get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|s| s.trim().parse::<i64>().ok())
                .and_then(date_from_millis)
        }
        _ => None,
    }
}

/// Normalize a numeric or string amount value, including extended-JSON wrappers
pub fn parse_record_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != ',' && *c != '$')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        Value::Object(map) => ["$numberDecimal", "$numberDouble", "$numberInt", "$numberLong"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(parse_record_amount),
        _ => None,
    }?;

    amount.is_finite().then_some(amount)
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(date: Value, amount: Value) -> RawTransaction {
        RawTransaction {
            date: Some(date),
            amount: Some(amount),
        }
    }

    #[test]
    fn test_aggregate_sums_per_month_and_sorts() {
        let records = vec![
            raw(json!("2024-03-02"), json!(100.0)),
            raw(json!("2024-01-15"), json!(50.0)),
            raw(json!("2024-01-31"), json!(-20.0)),
            raw(json!("2024-03-28"), json!(25.5)),
            raw(json!("2023-12-01"), json!(10.0)),
        ];

        let monthly = aggregate(&records).unwrap();
        let indices: Vec<i32> = monthly.iter().map(|m| m.month_index.value()).collect();
        assert_eq!(indices, vec![202312, 202401, 202403]);
        assert_eq!(monthly[0].total_amount, 10.0);
        assert_eq!(monthly[1].total_amount, 30.0);
        assert_eq!(monthly[2].total_amount, 125.5);
    }

    #[test]
    fn test_aggregate_indices_strictly_ascending() {
        let records: Vec<RawTransaction> = (0..40)
            .map(|i| {
                let month = (i * 7) % 12 + 1;
                let year = 2020 + (i % 4);
                raw(json!(format!("{}-{:02}-10", year, month)), json!(i as f64))
            })
            .collect();

        let monthly = aggregate(&records).unwrap();
        for pair in monthly.windows(2) {
            assert!(pair[0].month_index < pair[1].month_index);
        }

        let total: f64 = monthly.iter().map(|m| m.total_amount).sum();
        let expected: f64 = (0..40).map(|i| i as f64).sum();
        assert_eq!(total, expected);
    }

    #[test]
    fn test_aggregate_empty_input() {
        let result = aggregate(&[]);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_aggregate_missing_date() {
        let records = vec![
            raw(json!("2024-01-15"), json!(50.0)),
            RawTransaction {
                date: None,
                amount: Some(json!(10.0)),
            },
        ];
        match aggregate(&records) {
            Err(Error::MissingField(field)) => assert!(field.contains("date")),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_missing_amount() {
        let records = vec![RawTransaction {
            date: Some(json!("2024-01-15")),
            amount: None,
        }];
        match aggregate(&records) {
            Err(Error::MissingField(field)) => assert!(field.contains("amount")),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_unparseable_date_is_missing_field() {
        let records = vec![raw(json!("not a date"), json!(1.0))];
        assert!(matches!(aggregate(&records), Err(Error::MissingField(_))));
    }

    #[test]
    fn test_parse_plain_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_record_date(&json!("2024-01-15")), Some(expected));
        assert_eq!(
            parse_record_date(&json!("2024-01-15T10:30:00Z")),
            Some(expected)
        );
        assert_eq!(
            parse_record_date(&json!("2024-01-15T10:30:00.123Z")),
            Some(expected)
        );
        assert_eq!(
            parse_record_date(&json!("2024-01-15 10:30:00")),
            Some(expected)
        );
        assert_eq!(parse_record_date(&json!("01/15/2024")), Some(expected));
    }

    #[test]
    fn test_parse_wrapped_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            parse_record_date(&json!({"$date": "2024-01-15T00:00:00Z"})),
            Some(expected)
        );
        // 2024-01-15T00:00:00Z in epoch millis
        assert_eq!(
            parse_record_date(&json!({"$date": {"$numberLong": "1705276800000"}})),
            Some(expected)
        );
        assert_eq!(
            parse_record_date(&json!({"$date": 1705276800000i64})),
            Some(expected)
        );
        assert_eq!(parse_record_date(&json!({"other": "2024-01-15"})), None);
        assert_eq!(parse_record_date(&json!(true)), None);
    }

    #[test]
    fn test_plain_and_wrapped_dates_share_a_bucket() {
        let records = vec![
            raw(json!("2024-02-01"), json!(1.0)),
            raw(json!({"$date": "2024-02-20T12:00:00Z"}), json!(2.0)),
        ];
        let monthly = aggregate(&records).unwrap();
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].total_amount, 3.0);
    }

    #[test]
    fn test_parse_amounts() {
        assert_eq!(parse_record_amount(&json!(12.5)), Some(12.5));
        assert_eq!(parse_record_amount(&json!(-3)), Some(-3.0));
        assert_eq!(parse_record_amount(&json!("1,250.75")), Some(1250.75));
        assert_eq!(parse_record_amount(&json!("$40")), Some(40.0));
        assert_eq!(
            parse_record_amount(&json!({"$numberDecimal": "99.99"})),
            Some(99.99)
        );
        assert_eq!(parse_record_amount(&json!("abc")), None);
        assert_eq!(parse_record_amount(&json!(null)), None);
    }
}
