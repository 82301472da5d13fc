/// Scheduler Service Library
///
/// Backend for the post-scheduling dashboard: users connect social accounts,
/// compose text and video posts, schedule them for future publication, and
/// read calendar/queue groupings of what they have queued. "Scheduling"
/// writes a timestamp into the post record; dispatching at that time belongs
/// to a publisher that does not exist yet.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for posts, accounts, bindings, media
/// - `services`: Business logic, including the pure date-bucketing module
/// - `db`: Storage trait with PostgreSQL and in-memory implementations
/// - `storage`: Object storage trait with S3 and in-memory implementations
/// - `middleware`: Bearer-token auth and request metrics
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors and the /metrics endpoint
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
