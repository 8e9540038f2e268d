//! Client Layer Tests
//!
//! End-to-end tests of the public tenantdb API against the in-process server:
//! - Connection routing across the system database and tenants
//! - Document CRUD with Etag-based optimistic concurrency
//! - Prefix queries, listings and database names
//! - Configuration loading

#[path = "../common/mod.rs"]
mod common;

mod config;
mod crud;
mod listing;
mod scenario;
