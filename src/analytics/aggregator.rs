//! Aggregator - Memoized Dashboard View
//!
//! Keyed by the generation of every section plus the calendar day, which
//! together fully determine the output.

use std::sync::Arc;

use chrono::NaiveDate;
use hashlink::LruCache;
use serde::Serialize;
use tracing::trace;

use super::{Collections, DashboardCounts, Insights, MaintenanceBuckets, upcoming};
use crate::constants::AGGREGATE_CACHE_CAPACITY;
use crate::domain::MaintenanceTask;

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub today: NaiveDate,
    pub counts: DashboardCounts,
    pub buckets: MaintenanceBuckets,
    pub upcoming: Vec<MaintenanceTask>,
    pub insights: Insights,
}

impl DashboardView {
    pub fn compute(input: &Collections<'_>, today: NaiveDate, upcoming_limit: usize) -> Self {
        Self {
            today,
            counts: DashboardCounts::compute(input, today),
            buckets: MaintenanceBuckets::compute(input.maintenance, today),
            upcoming: upcoming(input.maintenance, today, upcoming_limit),
            insights: Insights::compute(input),
        }
    }
}

/// Cache key: per-section generations (devices, rules, maintenance,
/// notifications, users, safety) and the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub generations: [u64; 6],
    pub today: NaiveDate,
}

pub struct Aggregator {
    cache: LruCache<ViewKey, Arc<DashboardView>>,
    upcoming_limit: usize,
    hits: u64,
    misses: u64,
}

impl Aggregator {
    pub fn new(upcoming_limit: usize) -> Self {
        Self {
            cache: LruCache::new(AGGREGATE_CACHE_CAPACITY),
            upcoming_limit,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached view for `key`, computing it from `input` on a miss.
    ///
    /// `input` must be the collections the generations in `key` refer to.
    pub fn view(&mut self, key: ViewKey, input: &Collections<'_>) -> Arc<DashboardView> {
        if let Some(view) = self.cache.get(&key) {
            self.hits += 1;
            return Arc::clone(view);
        }

        self.misses += 1;
        trace!(?key, "Recomputing dashboard view");
        let view = Arc::new(DashboardView::compute(input, key.today, self.upcoming_limit));
        self.cache.insert(key, Arc::clone(&view));
        view
    }

    /// `(hits, misses)` since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("cached", &self.cache.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
