//! Where transaction records come from
//!
//! - `Database` serves the stored `transactions` table
//! - `JsonTransactionSource` reads a JSON array of records, the shape batch jobs
//!   hand over on the command line or in a file
//!
//! Sources return records unvalidated. Shape checks happen once, in
//! [`crate::aggregate`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::aggregate::validate_records;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::RawTransaction;

/// Supplier of raw transaction records
pub trait TransactionSource: Send + Sync {
    /// Every record known to the source
    fn fetch_transactions(&self) -> Result<Vec<RawTransaction>>;

    /// Sum of all amounts, used as current savings in batch projections
    ///
    /// Records are validated the same way aggregation does, so a malformed or
    /// empty source fails here instead of producing a partial total.
    fn total_savings(&self) -> Result<f64> {
        let records = self.fetch_transactions()?;
        Ok(validate_records(&records)?.iter().map(|tx| tx.amount).sum())
    }
}

impl TransactionSource for Database {
    fn fetch_transactions(&self) -> Result<Vec<RawTransaction>> {
        self.raw_transactions()
    }

    // Stored rows are always complete, so only emptiness needs checking
    fn total_savings(&self) -> Result<f64> {
        if self.count_transactions()? == 0 {
            return Err(Error::EmptyInput);
        }
        Database::total_savings(self)
    }
}

/// In-memory records parsed from a JSON array document
#[derive(Debug, Clone, Default)]
pub struct JsonTransactionSource {
    records: Vec<RawTransaction>,
}

impl JsonTransactionSource {
    pub fn new(records: Vec<RawTransaction>) -> Self {
        Self { records }
    }

    /// Parse a JSON array such as `[{"date": "2024-01-15", "amount": 1200}]`
    pub fn from_json(content: &str) -> Result<Self> {
        let records: Vec<RawTransaction> = serde_json::from_str(content)?;
        debug!(count = records.len(), "Parsed transaction records from JSON");
        Ok(Self::new(records))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TransactionSource for JsonTransactionSource {
    fn fetch_transactions(&self) -> Result<Vec<RawTransaction>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_source_accepts_wrapped_dates() {
        let source = JsonTransactionSource::from_json(
            r#"[
                {"date": "2024-01-15", "amount": 1200},
                {"date": {"$date": "2024-02-01T00:00:00Z"}, "amount": "300.50"},
                {"amount": 10}
            ]"#,
        )
        .unwrap();

        let records = source.fetch_transactions().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].date, Some(json!({"$date": "2024-02-01T00:00:00Z"})));
        assert!(records[2].date.is_none());
    }

    #[test]
    fn test_json_source_rejects_non_array() {
        assert!(JsonTransactionSource::from_json(r#"{"date": "2024-01-01"}"#).is_err());
    }

    #[test]
    fn test_default_total_savings() {
        let source = JsonTransactionSource::new(vec![
            RawTransaction::new("2024-01-01", 100.0),
            RawTransaction::new("2024-01-02", "-25.5"),
        ]);
        assert_eq!(source.total_savings().unwrap(), 74.5);
    }

    #[test]
    fn test_total_savings_rejects_bad_records() {
        let source = JsonTransactionSource::new(vec![
            RawTransaction::new("2024-01-01", 100.0),
            RawTransaction::new("2024-01-03", "n/a"),
        ]);
        assert!(matches!(source.total_savings(), Err(Error::MissingField(_))));

        let empty = JsonTransactionSource::default();
        assert!(matches!(empty.total_savings(), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_database_total_savings_requires_rows() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            TransactionSource::total_savings(&db),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tx.json");
        fs::write(&path, r#"[{"date": "2024-05-05", "amount": 5}]"#).unwrap();

        let source = JsonTransactionSource::from_path(&path).unwrap();
        assert_eq!(source.len(), 1);
        assert!(JsonTransactionSource::from_path(&dir.path().join("nope.json")).is_err());
    }
}
