//! Testing utilities for coop client tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use coop_client::testing::load_fixture;
//!
//! let fixture = load_fixture("auth/login_success.json");
//! ```

use std::path::Path;

use serde_json::Value;

use crate::models::User;

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// A user record with the given id and username.
pub fn user(id: i64, username: &str) -> User {
    serde_json::from_value(serde_json::json!({"id": id, "username": username}))
        .expect("valid user")
}
