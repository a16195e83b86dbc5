//! service-core: Shared infrastructure for the avatar session services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
