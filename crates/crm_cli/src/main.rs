//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `crm_core` linkage, configuration loading and schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `crm_cli [config.json]`. Without a config file an in-memory
//! store is opened.

use crm_core::db::migrations::current_user_version;
use crm_core::{init_logging_from_config, open_db_with_config, CoreConfig};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("crm_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::from_file(&path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config)?;

    let conn = open_db_with_config(&config).map_err(|err| err.to_string())?;
    let schema_version = current_user_version(&conn).map_err(|err| err.to_string())?;
    info!("event=cli_probe module=cli status=ok schema_version={schema_version}");

    println!("crm_core ping={}", crm_core::ping());
    println!("crm_core version={}", crm_core::core_version());
    println!("crm_core schema_version={schema_version}");
    Ok(())
}
