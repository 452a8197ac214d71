//! # Anton
//!
//! A REST service for creating, searching, reading and updating player records
//! stored in MongoDB.
//!
//! ## Architecture
//!
//! - **models**: The player record and its identifier
//! - **query**: Search filters and partial-update field sets
//! - **storage**: The player store trait and its MongoDB / in-memory backends
//! - **api**: REST API endpoints
//! - **config**: Settings loading and validation

pub mod api;
pub mod config;
pub mod models;
pub mod query;
pub mod storage;

pub use models::*;
