//! Notification - User Notifications

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dates::lenient_timestamp;
use super::{normalize_token, null_as_default};

/// Notification severity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationType {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    Other(String),
}

impl NotificationType {
    pub fn token(&self) -> &str {
        match self {
            NotificationType::Info => "INFO",
            NotificationType::Warning => "WARNING",
            NotificationType::Error => "ERROR",
            NotificationType::Success => "SUCCESS",
            NotificationType::Other(raw) => raw,
        }
    }
}

impl From<String> for NotificationType {
    fn from(raw: String) -> Self {
        match normalize_token(&raw).as_str() {
            "INFO" => NotificationType::Info,
            "WARNING" => NotificationType::Warning,
            "ERROR" => NotificationType::Error,
            "SUCCESS" => NotificationType::Success,
            _ => NotificationType::Other(raw),
        }
    }
}

impl From<NotificationType> for String {
    fn from(kind: NotificationType) -> Self {
        kind.token().to_string()
    }
}

/// A notification addressed to the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: NotificationType,
    /// Free-form grouping such as `MAINTENANCE_ASSIGNMENT`
    pub category: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub read: bool,
    pub device_id: Option<String>,
    pub rule_id: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// Number of notifications with `read == false`
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Mark one notification read. Returns whether anything changed.
pub fn mark_read(notifications: &mut [Notification], id: &str) -> bool {
    match notifications.iter_mut().find(|n| n.id == id) {
        Some(notification) if !notification.read => {
            notification.read = true;
            true
        }
        _ => false,
    }
}

/// Mark every notification read; idempotent. Returns how many changed.
pub fn mark_all_read(notifications: &mut [Notification]) -> usize {
    let mut changed = 0;
    for notification in notifications.iter_mut().filter(|n| !n.read) {
        notification.read = true;
        changed += 1;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Notification> {
        (0..5)
            .map(|i| Notification {
                id: format!("n-{i}"),
                title: format!("Notification {i}"),
                read: i >= 2,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_unread_count() {
        let notifications = sample();
        assert_eq!(notifications.len(), 5);
        assert_eq!(unread_count(&notifications), 2);
    }

    #[test]
    fn test_mark_all_read_idempotent() {
        let mut notifications = sample();
        assert_eq!(mark_all_read(&mut notifications), 2);
        let once = notifications.clone();

        assert_eq!(mark_all_read(&mut notifications), 0);
        assert_eq!(notifications, once);
        assert!(notifications.iter().all(|n| n.read));
        assert_eq!(unread_count(&notifications), 0);
    }

    #[test]
    fn test_mark_read_single() {
        let mut notifications = sample();
        assert!(mark_read(&mut notifications, "n-1"));
        assert!(!mark_read(&mut notifications, "n-1"));
        assert!(!mark_read(&mut notifications, "missing"));
        assert_eq!(unread_count(&notifications), 1);
    }
}
