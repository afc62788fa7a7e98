//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use goalcast_core::{db::Database, import::parse_csv};
use tracing::debug;

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let transactions = parse_csv(csv_file).context("Failed to parse CSV")?;

    println!("   Found {} transactions", transactions.len());

    let mut imported = 0;
    let mut skipped = 0;

    for tx in &transactions {
        let result = db.insert_transaction(tx)?;
        if result.is_duplicate() {
            debug!(id = result.id(), date = %tx.date, "Skipping duplicate transaction");
            skipped += 1;
        } else {
            imported += 1;
        }
    }

    println!("✅ Import complete!");
    println!("   Imported: {}", imported);
    println!("   Skipped (duplicates): {}", skipped);

    if imported > 0 {
        println!();
        println!("   Run 'goalcast train' to refit the savings trend.");
    }

    Ok(())
}
