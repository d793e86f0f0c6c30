//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `oceannotes_core` linkage without a host UI.
//! - Report which backend the current environment would select.
//! - Optionally start file logging at the build's default level when
//!   `OCEANNOTES_LOG_DIR` names an absolute directory.

use oceannotes_core::{default_log_level, init_logging, GatewayConfig, LocalStore};

const LOG_DIR_ENV: &str = "OCEANNOTES_LOG_DIR";

fn main() {
    let level = default_log_level();
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(level, &log_dir) {
            eprintln!("oceannotes_core logging disabled: {err}");
        }
    }

    let config = GatewayConfig::from_env(LocalStore::InMemory);
    println!("oceannotes_core ping={}", oceannotes_core::ping());
    println!("oceannotes_core version={}", oceannotes_core::core_version());
    println!("oceannotes_core backend={}", config.backend_kind().label());
    println!("oceannotes_core log_level={level}");
}
