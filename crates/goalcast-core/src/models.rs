//! Domain models for Goalcast

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated transaction as seen by the forecasting pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Negative = expense, positive = income/saving
    pub amount: f64,
}

/// A transaction record as emitted by a transaction source, before validation
///
/// Both fields are kept as raw JSON values because stores disagree on shape:
/// dates arrive as plain strings or wrapped `{"$date": ...}` objects, amounts as
/// numbers or numeric strings. See [`crate::aggregate::parse_record_date`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: Option<serde_json::Value>,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

impl RawTransaction {
    pub fn new(date: impl Into<serde_json::Value>, amount: impl Into<serde_json::Value>) -> Self {
        Self {
            date: Some(date.into()),
            amount: Some(amount.into()),
        }
    }
}

impl From<&Transaction> for RawTransaction {
    fn from(tx: &Transaction) -> Self {
        Self::new(tx.date.to_string(), tx.amount)
    }
}

/// Whether a transaction adds to or draws from savings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "credit" | "deposit" => Ok(Self::Income),
            "expense" | "debit" | "withdrawal" => Ok(Self::Expense),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: income, expense)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored transaction row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    /// Hash for deduplication
    pub import_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A new transaction to be stored (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub import_hash: String,
}

/// Integer encoding of a calendar month as `year * 100 + month`
///
/// `202401` is January 2024. Ordering matches calendar ordering, which makes the
/// index usable directly as the regression's independent variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MonthIndex(i32);

impl MonthIndex {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "Month out of range: {}-{}",
                year, month
            )));
        }
        Ok(Self(year * 100 + month as i32))
    }

    pub fn from_date(date: &NaiveDate) -> Self {
        Self(date.year() * 100 + date.month() as i32)
    }

    pub fn year(&self) -> i32 {
        self.0.div_euclid(100)
    }

    pub fn month(&self) -> u32 {
        self.0.rem_euclid(100) as u32
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// The following calendar month (December rolls into January of the next year)
    pub fn next(&self) -> Self {
        if self.month() == 12 {
            Self((self.year() + 1) * 100 + 1)
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), 1)
    }
}

impl TryFrom<i32> for MonthIndex {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value.div_euclid(100), value.rem_euclid(100) as u32)
    }
}

impl From<MonthIndex> for i32 {
    fn from(index: MonthIndex) -> Self {
        index.0
    }
}

impl std::str::FromStr for MonthIndex {
    type Err = Error;

    /// Accepts `202401` or `2024-01`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((year, month)) = s.split_once('-') {
            let year: i32 = year
                .parse()
                .map_err(|_| Error::InvalidData(format!("Invalid month: {}", s)))?;
            let month: u32 = month
                .parse()
                .map_err(|_| Error::InvalidData(format!("Invalid month: {}", s)))?;
            return Self::new(year, month);
        }
        let value: i32 = s
            .parse()
            .map_err(|_| Error::InvalidData(format!("Invalid month index: {}", s)))?;
        Self::try_from(value)
    }
}

impl std::fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sum of all transactions within one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub month_index: MonthIndex,
    pub total_amount: f64,
}

/// A saved savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_savings: f64,
    pub created_at: DateTime<Utc>,
}

/// A new goal to be saved
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_savings: f64,
}
