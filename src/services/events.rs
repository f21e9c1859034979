//! Service Events
//!
//! Events emitted by the service layer to be consumed by the state layer.

use std::fmt;

/// A polled section of the dashboard
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Section {
    Devices,
    Rules,
    Maintenance,
    Notifications,
    Users,
    Safety,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Devices,
        Section::Rules,
        Section::Maintenance,
        Section::Notifications,
        Section::Users,
        Section::Safety,
    ];

    /// Name used in logs and poller task names
    pub fn name(&self) -> &'static str {
        match self {
            Section::Devices => "devices",
            Section::Rules => "rules",
            Section::Maintenance => "maintenance",
            Section::Notifications => "notifications",
            Section::Users => "users",
            Section::Safety => "safety",
        }
    }

    /// i18n key of the section title
    pub fn label_key(&self) -> &'static str {
        match self {
            Section::Devices => "section-devices",
            Section::Rules => "section-rules",
            Section::Maintenance => "section-maintenance",
            Section::Notifications => "section-notifications",
            Section::Users => "section-users",
            Section::Safety => "section-safety",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Banner severity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerLevel {
    Success,
    Info,
    Error,
}

/// Events emitted by the service layer
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceEvent {
    /// A poller published a new result (data or error) for a section
    SectionUpdated(Section),

    /// Transient user-facing message, raised after a mutation
    Banner(BannerLevel, String),

    /// All pollers were stopped
    Stopped,
}
