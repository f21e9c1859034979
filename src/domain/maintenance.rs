//! Maintenance - Scheduled Maintenance Tasks

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::dates::{lenient_raw, lenient_timestamp, parse_day};
use super::frequency::next_due_after;
use super::{normalize_token, null_as_default};
use crate::error::{Error, Result};

/// Task lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaintenanceStatus {
    #[default]
    Active,
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
    Other(String),
}

impl MaintenanceStatus {
    pub fn token(&self) -> &str {
        match self {
            MaintenanceStatus::Active => "ACTIVE",
            MaintenanceStatus::Pending => "PENDING",
            MaintenanceStatus::InProgress => "IN_PROGRESS",
            MaintenanceStatus::Completed => "COMPLETED",
            MaintenanceStatus::Cancelled => "CANCELLED",
            MaintenanceStatus::Overdue => "OVERDUE",
            MaintenanceStatus::Other(raw) => raw,
        }
    }

    /// Still waiting to be done (counts towards "pending")
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Active
                | MaintenanceStatus::Pending
                | MaintenanceStatus::InProgress
                | MaintenanceStatus::Overdue
        )
    }
}

impl From<String> for MaintenanceStatus {
    fn from(raw: String) -> Self {
        match normalize_token(&raw).as_str() {
            "ACTIVE" | "SCHEDULED" => MaintenanceStatus::Active,
            "PENDING" => MaintenanceStatus::Pending,
            "IN_PROGRESS" => MaintenanceStatus::InProgress,
            "COMPLETED" | "DONE" => MaintenanceStatus::Completed,
            "CANCELLED" | "CANCELED" => MaintenanceStatus::Cancelled,
            "OVERDUE" => MaintenanceStatus::Overdue,
            _ => MaintenanceStatus::Other(raw),
        }
    }
}

impl From<MaintenanceStatus> for String {
    fn from(status: MaintenanceStatus) -> Self {
        status.token().to_string()
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Task priority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    Other(String),
}

impl Priority {
    pub fn token(&self) -> &str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
            Priority::Other(raw) => raw,
        }
    }

    /// Ordering weight, unknown priorities sort last
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Other(_) => 4,
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match normalize_token(&raw).as_str() {
            "LOW" => Priority::Low,
            "MEDIUM" => Priority::Medium,
            "HIGH" => Priority::High,
            "CRITICAL" => Priority::Critical,
            _ => Priority::Other(raw),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.token().to_string()
    }
}

/// A maintenance task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceTask {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub task_name: String,
    pub device_id: Option<String>,
    pub device_name: Option<String>,
    pub component_name: Option<String>,
    pub maintenance_type: Option<String>,
    pub frequency: Option<String>,
    /// Raw value as received; see [`MaintenanceTask::next_due`]
    #[serde(deserialize_with = "lenient_raw")]
    pub next_maintenance: Option<String>,
    #[serde(deserialize_with = "lenient_raw")]
    pub last_maintenance: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(deserialize_with = "null_as_default")]
    pub status: MaintenanceStatus,
    pub assigned_to: Option<String>,
    pub estimated_duration: Option<String>,
    pub estimated_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl MaintenanceTask {
    /// Due day, `None` when missing or unparseable
    pub fn next_due(&self) -> Option<NaiveDate> {
        self.next_maintenance.as_deref().and_then(parse_day)
    }

    /// Day the task was last carried out
    pub fn last_done(&self) -> Option<NaiveDate> {
        self.last_maintenance.as_deref().and_then(parse_day)
    }

    pub fn is_completed(&self) -> bool {
        self.status == MaintenanceStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == MaintenanceStatus::Cancelled
    }

    /// Not completed or cancelled, and either flagged overdue by the backend
    /// or due before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.is_completed() || self.is_cancelled() {
            return false;
        }
        self.status == MaintenanceStatus::Overdue
            || self.next_due().is_some_and(|due| due < today)
    }

    /// Projected next occurrence after the last completion, from the frequency text
    pub fn projected_next(&self) -> Option<NaiveDate> {
        let base = self.last_done()?;
        Some(next_due_after(self.frequency.as_deref(), base))
    }

    /// Device label for display
    pub fn device_label(&self) -> &str {
        self.device_name
            .as_deref()
            .or(self.device_id.as_deref())
            .unwrap_or("-")
    }
}

/// Payload for creating or updating a maintenance task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDraft {
    pub task_name: String,
    pub device_id: String,
    pub frequency: String,
    pub next_maintenance: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl MaintenanceDraft {
    pub fn validate(&self) -> Result<()> {
        if self.task_name.trim().is_empty() {
            return Err(Error::validation("taskName", "task name is required"));
        }
        if self.device_id.trim().is_empty() {
            return Err(Error::validation("deviceId", "a device must be selected"));
        }
        if self.frequency.trim().is_empty() {
            return Err(Error::validation("frequency", "frequency is required"));
        }
        if parse_day(&self.next_maintenance).is_none() {
            return Err(Error::validation(
                "nextMaintenance",
                format!("'{}' is not a date (YYYY-MM-DD)", self.next_maintenance),
            ));
        }
        Ok(())
    }
}
