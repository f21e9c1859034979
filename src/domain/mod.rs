//! Domain - Pure Data Structures
//!
//! Records as the gateway returns them. Nothing here touches the network or
//! the runtime; the analytics and listing layers operate on these types.

pub mod config;
pub mod dates;
pub mod device;
pub mod frequency;
pub mod maintenance;
pub mod notification;
pub mod rule;
pub mod safety;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use device::{Device, DeviceDraft, DeviceStatus, DeviceType, Protocol};
pub use maintenance::{MaintenanceDraft, MaintenanceStatus, MaintenanceTask, Priority};
pub use notification::{Notification, NotificationType};
pub use rule::{Rule, RuleAction, RuleCondition, RuleDraft};
pub use safety::{SafetyPrecaution, Severity};
pub use user::{Role, User};

/// Normalize an enum token coming from the backend.
///
/// `"in progress"`, `"in-progress"` and `"IN_PROGRESS"` all become
/// `"IN_PROGRESS"`.
pub(crate) fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Serde helper: JSON `null` reads as the field's default.
///
/// Struct-level `#[serde(default)]` only covers missing fields; the backend
/// also sends explicit `null` for unset columns.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token(" in progress "), "IN_PROGRESS");
        assert_eq!(normalize_token("in-progress"), "IN_PROGRESS");
        assert_eq!(normalize_token("Online"), "ONLINE");
    }
}
