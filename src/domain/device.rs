//! Device - Managed Device Records

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dates::lenient_timestamp;
use super::{normalize_token, null_as_default};
use crate::error::{Error, Result};

/// Connectivity status reported by the backend
///
/// Unknown strings are preserved as `Other` so they can be displayed, but
/// they never satisfy a status facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    Online,
    #[default]
    Offline,
    Warning,
    Error,
    Other(String),
}

impl DeviceStatus {
    /// Canonical wire token, `None` for unrecognised statuses
    pub fn token(&self) -> Option<&'static str> {
        match self {
            DeviceStatus::Online => Some("ONLINE"),
            DeviceStatus::Offline => Some("OFFLINE"),
            DeviceStatus::Warning => Some("WARNING"),
            DeviceStatus::Error => Some("ERROR"),
            DeviceStatus::Other(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DeviceStatus::Online => "Online",
            DeviceStatus::Offline => "Offline",
            DeviceStatus::Warning => "Warning",
            DeviceStatus::Error => "Error",
            DeviceStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for DeviceStatus {
    fn from(raw: String) -> Self {
        match normalize_token(&raw).as_str() {
            "ONLINE" => DeviceStatus::Online,
            "OFFLINE" => DeviceStatus::Offline,
            "WARNING" => DeviceStatus::Warning,
            "ERROR" => DeviceStatus::Error,
            _ => DeviceStatus::Other(raw),
        }
    }
}

impl From<DeviceStatus> for String {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Other(raw) => raw,
            known => known.token().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Device category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    #[default]
    Sensor,
    Actuator,
    Gateway,
    Controller,
    Other(String),
}

impl DeviceType {
    pub fn token(&self) -> &str {
        match self {
            DeviceType::Sensor => "SENSOR",
            DeviceType::Actuator => "ACTUATOR",
            DeviceType::Gateway => "GATEWAY",
            DeviceType::Controller => "CONTROLLER",
            DeviceType::Other(raw) => raw,
        }
    }
}

impl From<String> for DeviceType {
    fn from(raw: String) -> Self {
        match normalize_token(&raw).as_str() {
            "SENSOR" => DeviceType::Sensor,
            "ACTUATOR" => DeviceType::Actuator,
            "GATEWAY" => DeviceType::Gateway,
            "CONTROLLER" => DeviceType::Controller,
            _ => DeviceType::Other(raw),
        }
    }
}

impl From<DeviceType> for String {
    fn from(kind: DeviceType) -> Self {
        kind.token().to_string()
    }
}

/// Communication protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Mqtt,
    #[default]
    Http,
    Coap,
}

/// A managed device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub device_type: DeviceType,
    #[serde(deserialize_with = "null_as_default")]
    pub status: DeviceStatus,
    pub location: Option<String>,
    pub protocol: Option<Protocol>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub battery_level: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_seen: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }
}

/// Payload for registering a new device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub location: String,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DeviceDraft {
    /// Client-side checks mirroring the backend's required fields
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "device name is required"));
        }
        if self.name.chars().count() > 100 {
            return Err(Error::validation("name", "must be at most 100 characters"));
        }
        if self.location.trim().is_empty() {
            return Err(Error::validation("location", "device location is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_deserialize_backend_shape() {
        let json = r#"{
            "id": "d-1",
            "name": "Boiler sensor",
            "type": "SENSOR",
            "status": "ONLINE",
            "location": "Plant A",
            "protocol": "MQTT",
            "lastSeen": "2025-03-14T09:30:00",
            "createdAt": [2025, 3, 14]
        }"#;
        let device: Device = serde_json::from_str(json).expect("device parses");
        assert_eq!(device.status, DeviceStatus::Online);
        assert_eq!(device.protocol, Some(Protocol::Mqtt));
        assert!(device.last_seen.is_some());
        assert!(device.created_at.is_none());
    }

    #[test]
    fn test_unknown_status_preserved() {
        let device: Device =
            serde_json::from_str(r#"{"id":"d-2","status":"MAINTENANCE_MODE"}"#).expect("parses");
        assert_eq!(
            device.status,
            DeviceStatus::Other("MAINTENANCE_MODE".to_string())
        );
        assert_eq!(device.status.token(), None);
    }

    #[test]
    fn test_status_case_insensitive() {
        assert_eq!(DeviceStatus::from("online".to_string()), DeviceStatus::Online);
        assert_eq!(String::from(DeviceStatus::Warning), "WARNING");
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = DeviceDraft {
            name: "Pump".to_string(),
            location: " ".to_string(),
            ..Default::default()
        };
        let err = draft.validate().expect_err("blank location");
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);

        draft.location = "Hall 2".to_string();
        assert!(draft.validate().is_ok());
    }
}
