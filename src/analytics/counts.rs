//! Dashboard headline counts

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::Collections;
use crate::domain::DeviceStatus;
use crate::domain::notification::unread_count;

/// Counters shown on the dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub total_devices: usize,
    pub online_devices: usize,
    pub offline_devices: usize,
    pub warning_devices: usize,
    pub error_devices: usize,

    pub total_rules: usize,
    pub active_rules: usize,
    pub rules_triggered_today: usize,
    /// Triggered within today and the six days before
    pub rules_triggered_week: usize,

    pub total_maintenance: usize,
    pub pending_maintenance: usize,
    pub overdue_maintenance: usize,

    pub unread_notifications: usize,

    pub total_users: usize,
    pub enabled_users: usize,

    pub active_precautions: usize,
    pub critical_precautions: usize,
}

impl DashboardCounts {
    pub fn compute(input: &Collections<'_>, today: NaiveDate) -> Self {
        let mut counts = Self {
            total_devices: input.devices.len(),
            total_rules: input.rules.len(),
            total_maintenance: input.maintenance.len(),
            unread_notifications: unread_count(input.notifications),
            total_users: input.users.len(),
            ..Self::default()
        };

        // Unrecognised statuses count towards the total only
        for device in input.devices {
            match device.status {
                DeviceStatus::Online => counts.online_devices += 1,
                DeviceStatus::Offline => counts.offline_devices += 1,
                DeviceStatus::Warning => counts.warning_devices += 1,
                DeviceStatus::Error => counts.error_devices += 1,
                DeviceStatus::Other(_) => {}
            }
        }

        let week_start = today.checked_sub_days(Days::new(6)).unwrap_or(today);
        for rule in input.rules {
            if rule.is_active() {
                counts.active_rules += 1;
            }
            if let Some(day) = rule.last_triggered.map(|t| t.date()) {
                if day == today {
                    counts.rules_triggered_today += 1;
                }
                if (week_start..=today).contains(&day) {
                    counts.rules_triggered_week += 1;
                }
            }
        }

        for task in input.maintenance {
            if task.status.is_open() {
                counts.pending_maintenance += 1;
            }
            if task.is_overdue(today) {
                counts.overdue_maintenance += 1;
            }
        }

        counts.enabled_users = input.users.iter().filter(|u| u.enabled).count();

        for precaution in input.safety.iter().filter(|p| p.is_active) {
            counts.active_precautions += 1;
            if precaution.severity.is_critical() {
                counts.critical_precautions += 1;
            }
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dates::parse_timestamp;
    use crate::domain::{Device, MaintenanceStatus, MaintenanceTask, Notification, Rule};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn device(status: &str) -> Device {
        Device {
            status: DeviceStatus::from(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_online_and_total_devices() {
        let devices = vec![device("ONLINE"), device("OFFLINE"), device("ONLINE")];
        let input = Collections {
            devices: &devices,
            ..Default::default()
        };
        let counts = DashboardCounts::compute(&input, day(2025, 3, 14));
        assert_eq!(counts.total_devices, 3);
        assert_eq!(counts.online_devices, 2);
        assert_eq!(counts.offline_devices, 1);
    }

    #[test]
    fn test_unknown_status_only_in_total() {
        let devices = vec![device("ONLINE"), device("REBOOTING")];
        let input = Collections {
            devices: &devices,
            ..Default::default()
        };
        let counts = DashboardCounts::compute(&input, day(2025, 3, 14));
        assert_eq!(counts.total_devices, 2);
        assert_eq!(
            counts.online_devices
                + counts.offline_devices
                + counts.warning_devices
                + counts.error_devices,
            1
        );
    }

    #[test]
    fn test_rule_trigger_windows() {
        let triggered = |raw: &str| Rule {
            last_triggered: parse_timestamp(raw),
            ..Default::default()
        };
        let rules = vec![
            triggered("2025-03-14T08:00:00"),
            triggered("2025-03-08T23:59:00"),
            triggered("2025-03-07T12:00:00"),
            Rule {
                active: false,
                ..Default::default()
            },
        ];
        let input = Collections {
            rules: &rules,
            ..Default::default()
        };
        let counts = DashboardCounts::compute(&input, day(2025, 3, 14));
        assert_eq!(counts.total_rules, 4);
        assert_eq!(counts.active_rules, 3);
        assert_eq!(counts.rules_triggered_today, 1);
        assert_eq!(counts.rules_triggered_week, 2);
    }

    #[test]
    fn test_maintenance_and_unread() {
        let tasks = vec![
            MaintenanceTask {
                next_maintenance: Some("2025-03-01".to_string()),
                ..Default::default()
            },
            MaintenanceTask {
                next_maintenance: Some("2025-03-20".to_string()),
                status: MaintenanceStatus::Pending,
                ..Default::default()
            },
            MaintenanceTask {
                next_maintenance: Some("2025-03-01".to_string()),
                status: MaintenanceStatus::Completed,
                ..Default::default()
            },
        ];
        let notifications = vec![
            Notification::default(),
            Notification {
                read: true,
                ..Default::default()
            },
        ];
        let input = Collections {
            maintenance: &tasks,
            notifications: &notifications,
            ..Default::default()
        };
        let counts = DashboardCounts::compute(&input, day(2025, 3, 14));
        assert_eq!(counts.total_maintenance, 3);
        assert_eq!(counts.pending_maintenance, 2);
        assert_eq!(counts.overdue_maintenance, 1);
        assert_eq!(counts.unread_notifications, 1);
    }
}
