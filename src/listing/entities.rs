//! [`Listable`] for the domain records

use chrono::NaiveTime;

use super::{FacetKind, Listable, SortKey, SortValue};
use crate::domain::{
    Device, MaintenanceStatus, MaintenanceTask, Notification, NotificationType, Priority, Rule,
    SafetyPrecaution, User,
};

fn opt(value: &Option<String>) -> Option<&str> {
    value.as_deref()
}

impl Listable for Device {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.id.as_str()];
        fields.extend(opt(&self.location));
        fields.extend(opt(&self.manufacturer));
        fields.extend(opt(&self.model));
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn facet(&self, kind: FacetKind) -> Option<String> {
        match kind {
            // Unrecognised statuses carry no facet value
            FacetKind::Status => self.status.token().map(str::to_string),
            FacetKind::Type => Some(self.device_type.token().to_string()),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::text(&self.name),
            SortKey::Status => SortValue::text(self.status.label()),
            SortKey::Date => SortValue::date(self.last_seen.or(self.created_at)),
        }
    }
}

impl Listable for Rule {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(opt(&self.description));
        fields.extend(opt(&self.device_id));
        fields.extend(self.conditions.iter().map(|c| c.metric.as_str()));
        fields
    }

    fn facet(&self, kind: FacetKind) -> Option<String> {
        match kind {
            FacetKind::Status => Some(rule_status(self).to_string()),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::text(&self.name),
            SortKey::Status => SortValue::text(rule_status(self)),
            SortKey::Date => SortValue::date(self.last_triggered),
        }
    }
}

fn rule_status(rule: &Rule) -> &'static str {
    if rule.is_active() { "ACTIVE" } else { "INACTIVE" }
}

impl Listable for MaintenanceTask {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.task_name.as_str()];
        fields.extend(opt(&self.device_name));
        fields.extend(opt(&self.device_id));
        fields.extend(opt(&self.component_name));
        fields.extend(opt(&self.description));
        fields.extend(opt(&self.assigned_to));
        fields
    }

    fn facet(&self, kind: FacetKind) -> Option<String> {
        match kind {
            FacetKind::Status => match &self.status {
                MaintenanceStatus::Other(_) => None,
                known => Some(known.token().to_string()),
            },
            FacetKind::Priority => match &self.priority {
                Priority::Other(_) => None,
                known => Some(known.token().to_string()),
            },
            FacetKind::Type => self.maintenance_type.clone(),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::text(&self.task_name),
            SortKey::Status => SortValue::text(self.status.token()),
            SortKey::Date => SortValue::date(self.next_due().map(|d| d.and_time(NaiveTime::MIN))),
        }
    }
}

impl Listable for Notification {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.message.as_str()];
        fields.extend(opt(&self.category));
        fields
    }

    fn facet(&self, kind: FacetKind) -> Option<String> {
        match kind {
            FacetKind::Type => match &self.kind {
                NotificationType::Other(_) => None,
                known => Some(known.token().to_string()),
            },
            FacetKind::Category => self.category.clone(),
            FacetKind::Read => Some(read_label(self).to_string()),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::text(&self.title),
            SortKey::Status => SortValue::text(read_label(self)),
            SortKey::Date => SortValue::date(self.created_at),
        }
    }
}

fn read_label(notification: &Notification) -> &'static str {
    if notification.read { "read" } else { "unread" }
}

impl Listable for User {
    fn search_text(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ]
    }

    fn facet(&self, kind: FacetKind) -> Option<String> {
        match kind {
            FacetKind::Role => Some(self.role.token().to_string()),
            FacetKind::Status => Some(user_status(self).to_string()),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::text(self.display_name()),
            SortKey::Status => SortValue::text(user_status(self)),
            SortKey::Date => SortValue::date(self.last_login),
        }
    }
}

fn user_status(user: &User) -> &'static str {
    if user.enabled { "ENABLED" } else { "DISABLED" }
}

impl Listable for SafetyPrecaution {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(opt(&self.description));
        fields.extend(opt(&self.recommended_action));
        fields.extend(opt(&self.device_id));
        fields
    }

    fn facet(&self, kind: FacetKind) -> Option<String> {
        match kind {
            FacetKind::Severity => Some(self.severity.token().to_string()),
            FacetKind::Category => self.category.clone(),
            FacetKind::Type => self.precaution_type.clone(),
            FacetKind::Status => Some(safety_status(self).to_string()),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::text(&self.title),
            SortKey::Status => SortValue::text(safety_status(self)),
            SortKey::Date => SortValue::date(self.created_at),
        }
    }
}

fn safety_status(precaution: &SafetyPrecaution) -> &'static str {
    if precaution.is_active { "ACTIVE" } else { "INACTIVE" }
}
