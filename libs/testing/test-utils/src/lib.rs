//! Shared test utilities
//!
//! - `TestDatabase`: PostgreSQL container with the customers schema applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic, collision-free customer data
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore] // needs Docker
//! async fn creates_customer() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("creates_customer");
//!     let body = data.customer_body("fido");
//! }
//! ```

use serde_json::{Value, json};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic values.
///
/// Values derive from a seed, so two tests sharing one database do not
/// collide on the unique `username` and `email` columns.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let data = TestDataBuilder::from_test_name("test_create_customer");
    /// assert!(data.username("fido").starts_with("fido-"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn username(&self, suffix: &str) -> String {
        format!("{}-{:x}", suffix, self.seed)
    }

    pub fn email(&self, suffix: &str) -> String {
        format!("{}@example.com", self.username(suffix))
    }

    /// A complete, valid customer request body.
    pub fn customer_body(&self, suffix: &str) -> Value {
        json!({
            "username": self.username(suffix),
            "password": "123456789",
            "first_name": "Fido",
            "last_name": "Dog",
            "gender": "MALE",
            "active": true,
            "address": "123 Broad St",
            "email": self.email(suffix),
        })
    }
}
