//! tauridock - build Tauri applications for every platform using Docker.
//!
//! This binary builds each requested platform/architecture target in its own
//! container, collects the installers and optionally publishes a checksummed
//! GitHub release.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging; --debug raises the default level
    let default_level = if std::env::args().any(|a| a == "--debug") {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Run CLI and get exit code
    let exit_code = match tauridock::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_fatal() {
                eprintln!("Stopped before any target was built.");
            }
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
