//! CSV transaction import
//!
//! Columns are found by header name, case-insensitively:
//!
//! | column        | required | notes                                         |
//! |---------------|----------|-----------------------------------------------|
//! | `date`        | yes      | `2024-01-15`, `01/15/2024`, `01/15/24`, ...   |
//! | `amount`      | yes      | `$1,234.56`, `-12.00`, `(12.00)`              |
//! | `description` | no       |                                               |
//! | `category`    | no       |                                               |
//! | `type`        | no       | `Income` / `Expense` (also credit/debit)      |
//!
//! An `Expense` row with a positive amount is stored negative, so stored
//! amounts always sum to the savings balance.

use std::collections::HashMap;
use std::io::Read;

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{NewTransaction, TransactionKind};

/// Header positions for one CSV file
struct Columns {
    date: usize,
    amount: usize,
    description: Option<usize>,
    category: Option<usize>,
    kind: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        Ok(Self {
            date: find(&["date", "transaction date"])
                .ok_or_else(|| Error::Import("CSV header has no 'date' column".into()))?,
            amount: find(&["amount"])
                .ok_or_else(|| Error::Import("CSV header has no 'amount' column".into()))?,
            description: find(&["description", "memo"]),
            category: find(&["category"]),
            kind: find(&["type", "kind"]),
        })
    }
}

/// Parse CSV data into transactions ready for insertion
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();
    // Identical rows within one file are distinct transactions
    let mut occurrences: HashMap<(NaiveDate, String, u64), u32> = HashMap::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = i + 2;

        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty())
        };

        let date_str = field(Some(columns.date))
            .ok_or_else(|| Error::Import(format!("Missing date on line {}", line)))?;
        let date = parse_date(&date_str)?;

        let amount_str = field(Some(columns.amount))
            .ok_or_else(|| Error::Import(format!("Missing amount on line {}", line)))?;
        let mut amount = parse_amount(&amount_str)?;

        let kind = match field(columns.kind) {
            Some(s) => Some(s.parse::<TransactionKind>().map_err(|e| {
                Error::Import(format!("{} on line {}", e, line))
            })?),
            None => None,
        };
        if kind == Some(TransactionKind::Expense) && amount > 0.0 {
            amount = -amount;
        }

        let description = field(columns.description);
        let category = field(columns.category);

        let key = (date, description.clone().unwrap_or_default(), amount.to_bits());
        let seen = occurrences.entry(key).or_insert(0);
        let import_hash = generate_hash(&date, description.as_deref().unwrap_or(""), amount, *seen);
        *seen += 1;

        transactions.push(NewTransaction {
            date,
            amount,
            description,
            category,
            kind,
            import_hash,
        });
    }

    debug!(count = transactions.len(), "Parsed CSV transactions");
    Ok(transactions)
}

/// Build a transaction entered by hand rather than imported
///
/// Manual entries are never deduplicated, so the hash is salted with the entry
/// time and a process-wide sequence number.
pub fn manual_transaction(
    date: NaiveDate,
    amount: f64,
    description: Option<String>,
    category: Option<String>,
    kind: Option<TransactionKind>,
) -> Result<NewTransaction> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    if !amount.is_finite() {
        return Err(Error::InvalidData(format!("Invalid amount: {}", amount)));
    }
    let amount = if kind == Some(TransactionKind::Expense) && amount > 0.0 {
        -amount
    } else {
        amount
    };

    let mut hasher = Sha256::new();
    hasher.update(b"manual");
    hasher.update(date.to_string().as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_be_bytes(),
    );
    hasher.update(SEQUENCE.fetch_add(1, Ordering::SeqCst).to_be_bytes());

    Ok(NewTransaction {
        date,
        amount,
        description: description.filter(|s| !s.trim().is_empty()),
        category: category.filter(|s| !s.trim().is_empty()),
        kind,
        import_hash: hex::encode(hasher.finalize()),
    })
}

/// Generate a unique hash for deduplication
///
/// `occurrence` separates repeated identical rows in the same file while keeping
/// re-imports of that file idempotent.
fn generate_hash(date: &NaiveDate, description: &str, amount: f64, occurrence: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    if occurrence > 0 {
        hasher.update(occurrence.to_be_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Parse a date string in various common formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%m-%d-%Y", // 01-15-2024
        "%d/%m/%Y", // 15/01/2024 (European)
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            // %Y also matches two digits, which would land `01/15/24` in year 24
            if fmt.contains("%Y") && date.year() < 1000 {
                continue;
            }
            return Ok(date);
        }
    }

    // ISO timestamps keep their calendar date
    if let Some((day, _)) = s.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("01/15/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("2024-01-15T09:30:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(
            parse_date("01/15/24").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("12/31/99").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
        // European day-first dates still need four digits
        assert_eq!(
            parse_date("15/01/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_csv_two_digit_year_lands_in_right_month() {
        let csv = "Date,Amount\n01/15/24,100.00\n";
        let transactions = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_parse_csv_with_types() {
        let csv = "Date,Description,Amount,Category,Type
2024-01-15,Salary,3000,Income,Income
2024-01-20,Rent,1200,Housing,Expense
2024-01-22,Refund,-40,Shopping,Expense";

        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[0].amount, 3000.0);
        assert_eq!(txs[0].kind, Some(TransactionKind::Income));
        // Positive expense is flipped, already-negative expense is kept
        assert_eq!(txs[1].amount, -1200.0);
        assert_eq!(txs[2].amount, -40.0);
        assert_eq!(txs[1].category, Some("Housing".to_string()));
    }

    #[test]
    fn test_parse_csv_minimal_columns() {
        let csv = "amount,date\n10.5,01/02/2024\n";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, 10.5);
        assert!(txs[0].description.is_none());
        assert!(txs[0].kind.is_none());
    }

    #[test]
    fn test_parse_csv_missing_required_column() {
        let csv = "date,description\n2024-01-01,Coffee\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(Error::Import(_))
        ));
    }

    #[test]
    fn test_parse_csv_bad_type() {
        let csv = "date,amount,type\n2024-01-01,5,transfer\n";
        assert!(parse_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_manual_transactions_never_collide() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let a = manual_transaction(date, 50.0, None, None, Some(TransactionKind::Expense)).unwrap();
        let b = manual_transaction(date, 50.0, None, None, Some(TransactionKind::Expense)).unwrap();

        assert_eq!(a.amount, -50.0);
        assert_ne!(a.import_hash, b.import_hash);
        assert!(manual_transaction(date, f64::INFINITY, None, None, None).is_err());
    }

    #[test]
    fn test_hash_is_stable_and_separates_repeats() {
        let csv = "date,amount,description
2024-01-01,5,Coffee
2024-01-01,5,Coffee";

        let first = parse_csv(csv.as_bytes()).unwrap();
        let again = parse_csv(csv.as_bytes()).unwrap();

        assert_ne!(first[0].import_hash, first[1].import_hash);
        assert_eq!(first[0].import_hash, again[0].import_hash);
        assert_eq!(first[1].import_hash, again[1].import_hash);
        assert_eq!(first[0].import_hash.len(), 64);
    }
}
