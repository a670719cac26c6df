//! Civic issue reporting: issue records, filtering, and dashboard analytics.
//!
//! The analytics engine ([`analytics::generate_analytics`]) is a pure
//! function over a slice of issues and departments. Everything that
//! supplies those slices goes through the [`storage::Storage`] trait.

pub mod analytics;
pub mod breakdown;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod live;
pub mod notifications;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
