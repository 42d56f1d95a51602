//! Common test utilities, fixtures, and mocks shared by the integration tests.
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::path::PathBuf;
use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Routes crate logs to the test writer. Safe to call from every test.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// A database path under the system temp dir that no other test uses.
pub fn scratch_db_path(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "encore-{}-{}-{}.db",
        label,
        std::process::id(),
        fixtures::random_id()
    ));
    path
}
