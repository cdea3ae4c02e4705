//! Test-only helpers shared across crate unit tests.
//!
//! Only compiled for unit tests. Keeps the HTTP scaffolding out of the
//! individual test files so they stay focused on client behaviour.

pub mod mock_server;
