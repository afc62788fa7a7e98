//! Status command implementation

use std::fs;
use std::path::Path;

use anyhow::Result;
use goalcast_core::{config::Config, db::DB_KEY_ENV, model_store::ModelStore};

use super::open_db;

pub fn cmd_status(db_path: &Path, config: &Config, no_encrypt: bool) -> Result<()> {
    println!();
    println!("📊 Goalcast Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    println!(
        "   Forecast: {} months → {}",
        config.forecast.horizon_months,
        config.forecast.output_path.display()
    );
    println!("   Default target: ${:.2}", config.goal.default_target);

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                println!();
                if let Ok(count) = db.count_transactions() {
                    println!("   Transactions: {}", count);
                }
                if let Ok(goals) = db.list_goals() {
                    println!("   Goals: {}", goals.len());
                }
                let store = config.model.open_store(&db);
                match store.load() {
                    Ok(model) => println!(
                        "   Model: trained {} ({} store)",
                        model.trained_at.format("%Y-%m-%d %H:%M"),
                        store.name()
                    ),
                    Err(_) => println!("   Model: not trained ({} store)", store.name()),
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}
