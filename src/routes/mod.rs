//! HTTP route handlers.
//!
//! One sub-module per endpoint. Handlers report domain failures inside the
//! 200 response envelope; transport-level errors are left to the framework.

pub mod signature;
