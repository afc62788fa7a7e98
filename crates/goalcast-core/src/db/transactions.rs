//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewTransaction, RawTransaction, StoredTransaction};

const TRANSACTION_COLUMNS: &str =
    "id, date, amount, description, category, kind, import_hash, created_at";

/// Result of inserting a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionInsertResult {
    /// Transaction was inserted successfully, contains new transaction ID
    Inserted(i64),
    /// Transaction was a duplicate, contains existing transaction ID
    Duplicate(i64),
}

impl TransactionInsertResult {
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Duplicate(id) => *id,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

impl Database {
    /// Insert a transaction (skips duplicates based on import_hash)
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<TransactionInsertResult> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE import_hash = ?",
                params![tx.import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(existing_id) = existing {
            return Ok(TransactionInsertResult::Duplicate(existing_id));
        }

        conn.execute(
            r#"
            INSERT INTO transactions (date, amount, description, category, kind, import_hash)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.date.to_string(),
                tx.amount,
                tx.description,
                tx.category,
                tx.kind.map(|k| k.as_str()),
                tx.import_hash,
            ],
        )?;

        Ok(TransactionInsertResult::Inserted(conn.last_insert_rowid()))
    }

    /// List transactions, newest first
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<StoredTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![limit, offset], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Helper to convert a row to StoredTransaction
    /// Column order: id, date, amount, description, category, kind, import_hash, created_at
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<StoredTransaction> {
        let date_str: String = row.get(1)?;
        let kind_str: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(7)?;
        Ok(StoredTransaction {
            id: row.get(0)?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            amount: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            kind: kind_str.and_then(|s| s.parse().ok()),
            import_hash: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<StoredTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE id = ?",
            TRANSACTION_COLUMNS
        ))?;

        let transaction = stmt
            .query_row(params![id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// Sum of every stored amount (the running savings balance)
    pub fn total_savings(&self) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// All stored records as (date, amount) pairs, oldest first
    pub fn raw_transactions(&self) -> Result<Vec<RawTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT date, amount FROM transactions ORDER BY date, id")?;

        let records = stmt
            .query_map([], |row| {
                let date: String = row.get(0)?;
                let amount: f64 = row.get(1)?;
                Ok(RawTransaction::new(date, amount))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
