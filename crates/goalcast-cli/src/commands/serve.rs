//! Server command implementation

use std::path::Path;

use anyhow::Result;
use goalcast_core::config::Config;
use goalcast_server::{ServerConfig, API_KEYS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    config: Config,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Goalcast web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let api_keys = ServerConfig::api_keys_from_env();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!("   ❌ No API keys configured - every request will be rejected");
        println!("      Set {} or use --no-auth for local development", API_KEYS_ENV);
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            api_keys.len(),
            API_KEYS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let server_config = ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys,
    };

    goalcast_server::serve_with_config(db, config, host, port, server_config).await?;

    Ok(())
}
