//! Helpers shared by the test suites of the workspace.

pub mod client;
pub mod database;

use std::path::PathBuf;

/// Find a file of the repository via the crate root provided by `cargo test`.
/// This depends on the convention that this crate lives in `/crates/tests/<name>`.
pub fn repository_file(path: &str) -> PathBuf {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("../../../");
    d.push(path);
    d
}

/// Send log output to the test harness, which shows it for failing tests only.
/// `RUST_LOG` picks the level, `debug` by default so the generated SQL shows up.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    // another test may have installed it already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
