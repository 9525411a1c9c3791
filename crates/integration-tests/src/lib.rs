//! Integration tests for Navona.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p navona-cli -- migrate
//! cargo run -p navona-cli -- seed
//!
//! # Start the storefront server
//! cargo run -p navona-storefront
//!
//! # Run integration tests
//! cargo test -p navona-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `NAVONA_BASE_URL` - Storefront base URL (default `http://localhost:3000`)
//! - `NAVONA_DATABASE_URL` - Used by tests that look up seeded ids directly
