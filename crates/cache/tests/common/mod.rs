//! Shared builders and test doubles.

/// Cache builders, address helpers, and tracing setup.
pub mod harness;
