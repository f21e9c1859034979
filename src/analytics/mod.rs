//! Analytics - Client-Side Aggregation
//!
//! Pure derivations over the polled collections: counts, maintenance
//! buckets, the upcoming list and insights. Every function takes the
//! collections plus "today" explicitly, so identical inputs always give
//! identical output and [`Aggregator`] can memoize on them.

mod aggregator;
mod counts;
mod insights;
mod schedule;

pub use aggregator::*;
pub use counts::*;
pub use insights::*;
pub use schedule::*;

use crate::domain::{Device, MaintenanceTask, Notification, Rule, SafetyPrecaution, User};

/// Borrowed view of every collection the dashboard aggregates
#[derive(Debug, Clone, Copy, Default)]
pub struct Collections<'a> {
    pub devices: &'a [Device],
    pub rules: &'a [Rule],
    pub maintenance: &'a [MaintenanceTask],
    pub notifications: &'a [Notification],
    pub users: &'a [User],
    pub safety: &'a [SafetyPrecaution],
}
