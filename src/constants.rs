//! Console Constants
//!
//! Centralized defaults for polling, timeouts and display.

/// Default poll intervals (seconds)
pub const DEVICES_POLL_SECS: u64 = 30;
pub const MAINTENANCE_POLL_SECS: u64 = 30;
pub const NOTIFICATIONS_POLL_SECS: u64 = 30;
pub const RULES_POLL_SECS: u64 = 60;
pub const USERS_POLL_SECS: u64 = 60;
pub const SAFETY_POLL_SECS: u64 = 60;

/// Poll intervals below this are clamped up
pub const MIN_POLL_SECS: u64 = 5;

/// Client-side deadline for a single gateway call
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default gateway base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Banner lifetimes
pub const SUCCESS_BANNER_SECS: i64 = 5;
pub const ERROR_BANNER_SECS: i64 = 10;
pub const BANNER_HISTORY_CAPACITY: usize = 50;

/// Display limits
pub const UPCOMING_DISPLAY_LIMIT: usize = 5;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Completed tasks newer than this many days count as "recently completed"
pub const RECENT_COMPLETED_DAYS: i64 = 7;

/// Bucket horizons (days from today, inclusive)
pub const NEXT_WEEK_DAYS: i64 = 7;
pub const NEXT_MONTH_DAYS: i64 = 30;

/// Number of memoized dashboard views kept
pub const AGGREGATE_CACHE_CAPACITY: usize = 8;

/// Environment variable overriding the stored bearer token
pub const TOKEN_ENV_VAR: &str = "IOT_CONSOLE_TOKEN";

/// Event ingest cadence of the watch loop
pub const INGEST_INTERVAL_MS: u64 = 250;
pub const INGEST_BATCH_SIZE: usize = 256;

/// Banner expiry check period
pub const BANNER_TICK_SECS: u64 = 1;
