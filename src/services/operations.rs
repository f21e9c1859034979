//! Operations - Validated Mutations
//!
//! Every mutation validates its input, calls the gateway once and raises a
//! success or error banner. When a section has a refresh handle attached,
//! a successful mutation also triggers an immediate re-fetch of it.

use std::future::Future;
use std::sync::Arc;

use crossbeam_channel::Sender;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::domain::{
    Device, DeviceDraft, DeviceStatus, MaintenanceDraft, MaintenanceTask, Rule, RuleDraft,
};
use crate::error::{Error, Result};
use crate::i18n::{self, Locale};
use crate::services::{BannerLevel, Gateway, Section, ServiceEvent};

pub struct Operations {
    gateway: Arc<dyn Gateway>,
    locale: Locale,
    tx: Sender<ServiceEvent>,
    refreshers: Vec<(Section, Arc<Notify>)>,
}

impl Operations {
    /// Detached operations: banners only, no re-fetch
    pub fn new(gateway: Arc<dyn Gateway>, locale: Locale, tx: Sender<ServiceEvent>) -> Self {
        Self {
            gateway,
            locale,
            tx,
            refreshers: Vec::new(),
        }
    }

    /// Re-fetch `section` through `refresh` after each successful mutation
    pub fn with_refresh(mut self, section: Section, refresh: Arc<Notify>) -> Self {
        self.refreshers.push((section, refresh));
        self
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    // ==================== Device Operations ====================

    pub async fn create_device(&self, draft: &DeviceDraft) -> Result<Option<Device>> {
        self.mutate(Section::Devices, "banner-created", async {
            draft.validate()?;
            self.gateway.create_device(draft).await
        })
        .await
    }

    pub async fn delete_device(&self, id: &str) -> Result<()> {
        self.mutate(Section::Devices, "banner-deleted", async {
            require("id", id)?;
            self.gateway.delete_device(id).await
        })
        .await
    }

    pub async fn set_device_status(&self, id: &str, status: &DeviceStatus) -> Result<()> {
        self.mutate(Section::Devices, "banner-updated", async {
            require("id", id)?;
            if status.token().is_none() {
                return Err(Error::validation("status", format!("unknown status '{status}'")));
            }
            self.gateway.update_device_status(id, status).await
        })
        .await
    }

    // ==================== Rule Operations ====================

    pub async fn create_rule(&self, draft: &RuleDraft) -> Result<Option<Rule>> {
        self.mutate(Section::Rules, "banner-created", async {
            draft.validate()?;
            self.gateway.create_rule(draft).await
        })
        .await
    }

    pub async fn update_rule(&self, id: &str, draft: &RuleDraft) -> Result<Option<Rule>> {
        self.mutate(Section::Rules, "banner-updated", async {
            require("id", id)?;
            draft.validate()?;
            self.gateway.update_rule(id, draft).await
        })
        .await
    }

    pub async fn delete_rule(&self, id: &str) -> Result<()> {
        self.mutate(Section::Rules, "banner-deleted", async {
            require("id", id)?;
            self.gateway.delete_rule(id).await
        })
        .await
    }

    pub async fn toggle_rule(&self, id: &str) -> Result<()> {
        self.mutate(Section::Rules, "banner-toggled", async {
            require("id", id)?;
            self.gateway.toggle_rule(id).await
        })
        .await
    }

    // ==================== Maintenance Operations ====================

    pub async fn create_maintenance(
        &self,
        draft: &MaintenanceDraft,
    ) -> Result<Option<MaintenanceTask>> {
        self.mutate(Section::Maintenance, "banner-created", async {
            draft.validate()?;
            self.gateway.create_maintenance(draft).await
        })
        .await
    }

    pub async fn update_maintenance(
        &self,
        id: &str,
        draft: &MaintenanceDraft,
    ) -> Result<Option<MaintenanceTask>> {
        self.mutate(Section::Maintenance, "banner-updated", async {
            require("id", id)?;
            draft.validate()?;
            self.gateway.update_maintenance(id, draft).await
        })
        .await
    }

    pub async fn delete_maintenance(&self, id: &str) -> Result<()> {
        self.mutate(Section::Maintenance, "banner-deleted", async {
            require("id", id)?;
            self.gateway.delete_maintenance(id).await
        })
        .await
    }

    pub async fn complete_maintenance(&self, id: &str) -> Result<Option<MaintenanceTask>> {
        self.mutate(Section::Maintenance, "banner-completed", async {
            require("id", id)?;
            self.gateway.complete_maintenance(id).await
        })
        .await
    }

    pub async fn assign_maintenance(&self, id: &str, assignee_id: &str) -> Result<()> {
        self.mutate(Section::Maintenance, "banner-assigned", async {
            require("id", id)?;
            require("assignedTo", assignee_id)?;
            self.gateway.assign_maintenance(id, assignee_id).await
        })
        .await
    }

    // ==================== Notification Operations ====================

    pub async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.mutate(Section::Notifications, "banner-read", async {
            require("id", id)?;
            self.gateway.mark_notification_read(id).await
        })
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        self.mutate(Section::Notifications, "banner-read", async {
            self.gateway.mark_all_notifications_read().await
        })
        .await
    }

    // ==================== Internals ====================

    /// Run a mutation, then re-fetch its section and raise a banner
    async fn mutate<T, F>(&self, section: Section, done_key: &'static str, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let label = i18n::t(self.locale, section.label_key());
        match op.await {
            Ok(value) => {
                info!(%section, action = done_key, "Mutation succeeded");
                self.refresh(section);
                self.banner(
                    BannerLevel::Success,
                    format!("{label}: {}", i18n::t(self.locale, done_key)),
                );
                Ok(value)
            }
            Err(e) => {
                warn!(%section, action = done_key, error = %e, "Mutation failed");
                self.banner(
                    BannerLevel::Error,
                    format!("{label}: {}", i18n::error_message(self.locale, &e)),
                );
                Err(e)
            }
        }
    }

    fn refresh(&self, section: Section) {
        self.refreshers
            .iter()
            .filter(|(s, _)| *s == section)
            .for_each(|(_, refresh)| refresh.notify_one());
    }

    fn banner(&self, level: BannerLevel, message: String) {
        let _ = self.tx.send(ServiceEvent::Banner(level, message));
    }
}

impl std::fmt::Debug for Operations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sections: Vec<Section> = self.refreshers.iter().map(|(s, _)| *s).collect();
        f.debug_struct("Operations")
            .field("locale", &self.locale)
            .field("refreshes", &sections)
            .finish()
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::Receiver;

    use super::*;
    use crate::services::MockGateway;

    fn detached(mock: MockGateway) -> (Operations, Receiver<ServiceEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Operations::new(Arc::new(mock), Locale::EnUS, tx), rx)
    }

    fn drain_banners(rx: &Receiver<ServiceEvent>) -> Vec<(BannerLevel, String)> {
        rx.try_iter()
            .filter_map(|event| match event {
                ServiceEvent::Banner(level, message) => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_gateway() {
        let mut mock = MockGateway::new();
        mock.expect_create_rule().never();
        let (ops, events) = detached(mock);

        let err = ops
            .create_rule(&RuleDraft::default())
            .await
            .expect_err("empty draft rejected");
        assert!(matches!(err, Error::Validation { .. }));

        let banners = drain_banners(&events);
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].0, BannerLevel::Error);
        assert!(banners[0].1.starts_with("Rules: Invalid input"));
    }

    #[tokio::test]
    async fn test_failed_mutation_returns_error_and_banner() {
        let mut mock = MockGateway::new();
        mock.expect_complete_maintenance()
            .returning(|_| Err(Error::from_status(404, "")));
        let (ops, events) = detached(mock);

        let err = ops.complete_maintenance("m-404").await.expect_err("not found");
        assert!(matches!(err, Error::NotFound { .. }));
        let banners = drain_banners(&events);
        assert_eq!(banners[0].0, BannerLevel::Error);
        assert!(banners[0].1.contains("Not found"));
    }

    #[tokio::test]
    async fn test_detached_mutation_calls_gateway_once() {
        // No list expectations: any poll would panic the mock
        let mut mock = MockGateway::new();
        mock.expect_toggle_rule()
            .withf(|id| id == "r-1")
            .times(1)
            .returning(|_| Ok(()));
        let (ops, events) = detached(mock);

        ops.toggle_rule("r-1").await.expect("toggle succeeds");
        assert_eq!(
            drain_banners(&events),
            vec![(BannerLevel::Success, "Rules: Rule toggled".to_string())]
        );
    }

    #[tokio::test]
    async fn test_success_notifies_only_its_section() {
        let mut mock = MockGateway::new();
        mock.expect_mark_all_notifications_read().returning(|| Ok(()));
        let (ops, _events) = detached(mock);
        let notifications = Arc::new(Notify::new());
        let rules = Arc::new(Notify::new());
        let ops = ops
            .with_refresh(Section::Notifications, Arc::clone(&notifications))
            .with_refresh(Section::Rules, Arc::clone(&rules));

        ops.mark_all_notifications_read().await.expect("ok");

        // notify_one stores a permit that a later notified() consumes at once
        tokio::time::timeout(std::time::Duration::from_millis(50), notifications.notified())
            .await
            .expect("notifications refreshed");
        assert!(
            tokio::time::timeout(std::time::Duration::from_millis(50), rules.notified())
                .await
                .is_err()
        );
    }
}
