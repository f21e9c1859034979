//! Insights - Distributions and Rates
//!
//! Only what the polled data supports. A rate whose denominator is zero, or
//! that would need data the gateway does not expose (rule execution outcomes),
//! is [`Metric::Unavailable`] rather than a made-up number.

use std::fmt;

use ahash::AHashMap;
use serde::Serialize;

use super::Collections;
use crate::domain::{DeviceStatus, Priority};
use crate::utils::format::format_percent;

/// A percentage that may not be computable
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Metric {
    /// Percentage in `0.0..=100.0`
    Percent(f64),
    Unavailable,
}

impl Metric {
    pub fn ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            Metric::Unavailable
        } else {
            Metric::Percent(part as f64 * 100.0 / whole as f64)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Percent(v) => Some(*v),
            Metric::Unavailable => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Percent(v) => f.write_str(&format_percent(*v)),
            Metric::Unavailable => f.write_str("n/a"),
        }
    }
}

/// One slice of a distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Online/Offline/Warning/Error plus any unrecognised statuses
    pub device_status: Vec<Share>,
    pub device_types: Vec<Share>,
    pub locations: Vec<Share>,
    /// Active rules over all rules
    pub rule_activation_rate: Metric,
    /// Needs execution outcomes the gateway does not report
    pub rule_success_rate: Metric,
    /// Completed over all non-cancelled tasks
    pub maintenance_completion_rate: Metric,
    /// Open tasks per priority, CRITICAL first
    pub open_by_priority: Vec<Share>,
}

impl Insights {
    pub fn compute(input: &Collections<'_>) -> Self {
        let devices = input.devices;

        let device_status = distribution(devices.iter().map(|d| match &d.status {
            DeviceStatus::Other(raw) => raw.clone(),
            known => known.label().to_string(),
        }));
        let device_types = distribution(devices.iter().map(|d| d.device_type.token().to_string()));
        let locations = distribution(devices.iter().map(|d| {
            d.location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or("-")
                .to_string()
        }));

        let active_rules = input.rules.iter().filter(|r| r.is_active()).count();

        let tasks = input.maintenance;
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        let countable = tasks.iter().filter(|t| !t.is_cancelled()).count();

        let mut by_priority: Vec<(Priority, usize)> = Vec::new();
        for task in tasks.iter().filter(|t| t.status.is_open()) {
            match by_priority.iter_mut().find(|(p, _)| *p == task.priority) {
                Some((_, n)) => *n += 1,
                None => by_priority.push((task.priority.clone(), 1)),
            }
        }
        by_priority.sort_by_key(|(p, _)| p.rank());
        let open_total: usize = by_priority.iter().map(|(_, n)| n).sum();
        let open_by_priority = by_priority
            .into_iter()
            .map(|(p, count)| Share {
                label: p.token().to_string(),
                count,
                percent: Metric::ratio(count, open_total),
            })
            .collect();

        Self {
            device_status,
            device_types,
            locations,
            rule_activation_rate: Metric::ratio(active_rules, input.rules.len()),
            rule_success_rate: Metric::Unavailable,
            maintenance_completion_rate: Metric::ratio(completed, countable),
            open_by_priority,
        }
    }
}

/// Count labels; largest first, ties by label
fn distribution(labels: impl Iterator<Item = String>) -> Vec<Share> {
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    let mut total = 0;
    for label in labels {
        *counts.entry(label).or_default() += 1;
        total += 1;
    }

    let mut shares: Vec<Share> = counts
        .into_iter()
        .map(|(label, count)| Share {
            label,
            count,
            percent: Metric::ratio(count, total),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    shares
}
