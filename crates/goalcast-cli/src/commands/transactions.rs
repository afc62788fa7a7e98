//! Transaction command implementations

use anyhow::Result;
use goalcast_core::db::Database;

use super::truncate;

pub fn cmd_transactions_list(db: &Database, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(limit.max(1), 0)?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  goalcast import --file transactions.csv");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = if tx.amount < 0.0 {
            format!("\x1b[31m${:.2}\x1b[0m", tx.amount.abs()) // Red for expenses
        } else {
            format!("\x1b[32m+${:.2}\x1b[0m", tx.amount) // Green for income
        };

        println!(
            "   {} │ {:>10} │ {}",
            tx.date,
            amount_str,
            truncate(tx.description.as_deref().unwrap_or("-"), 40)
        );
    }

    println!();
    println!("   Balance: ${:.2}", db.total_savings()?);

    Ok(())
}
