//! Service Hub
//!
//! Owns the gateway, one poller per section and the event channel the
//! state layer drains. Its `Operations` carry the pollers' refresh handles,
//! so every successful mutation is followed by a re-fetch of the affected
//! section. A poll that fails with a new error raises an error banner.

use std::sync::Arc;

use chrono::Local;
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::config::PollingConfig;
use crate::domain::{Device, MaintenanceTask, Notification, Rule, SafetyPrecaution, User};
use crate::error::Result;
use crate::i18n::{self, Locale};
use crate::services::{BannerLevel, Gateway, Operations, Poller, Section, ServiceEvent};
use crate::state::{DashboardInputs, SectionState};

/// Central hub for the gateway and its pollers
pub struct ServiceHub {
    locale: Locale,
    ops: Operations,
    devices: Poller<Device>,
    rules: Poller<Rule>,
    maintenance: Poller<MaintenanceTask>,
    notifications: Poller<Notification>,
    users: Poller<User>,
    safety: Poller<SafetyPrecaution>,
    /// Event sender (for internal use)
    tx: Sender<ServiceEvent>,
    /// Event receiver (for state layer)
    rx: Receiver<ServiceEvent>,
}

/// Build a poller whose fetch calls one gateway method
macro_rules! section_poller {
    ($gateway:expr, $section:expr, $secs:expr, $locale:expr, $method:ident) => {{
        let gateway = Arc::clone(&$gateway);
        Poller::spawn_with_locale(
            $section.name(),
            PollingConfig::interval($secs),
            $locale,
            move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.$method().await }
            },
        )
    }};
}

impl ServiceHub {
    /// Start every poller; must be called within a tokio runtime
    pub fn spawn(gateway: Arc<dyn Gateway>, polling: &PollingConfig, locale: Locale) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        let devices = section_poller!(
            gateway,
            Section::Devices,
            polling.devices,
            locale,
            list_devices
        );
        let rules = section_poller!(gateway, Section::Rules, polling.rules, locale, list_rules);
        let maintenance = section_poller!(
            gateway,
            Section::Maintenance,
            polling.maintenance,
            locale,
            list_maintenance
        );
        let notifications = section_poller!(
            gateway,
            Section::Notifications,
            polling.notifications,
            locale,
            list_notifications
        );
        let users = section_poller!(gateway, Section::Users, polling.users, locale, list_users);
        let safety = section_poller!(
            gateway,
            Section::Safety,
            polling.safety,
            locale,
            list_safety_precautions
        );

        forward(Section::Devices, locale, devices.subscribe(), tx.clone());
        forward(Section::Rules, locale, rules.subscribe(), tx.clone());
        forward(Section::Maintenance, locale, maintenance.subscribe(), tx.clone());
        forward(Section::Notifications, locale, notifications.subscribe(), tx.clone());
        forward(Section::Users, locale, users.subscribe(), tx.clone());
        forward(Section::Safety, locale, safety.subscribe(), tx.clone());

        let ops = Operations::new(gateway, locale, tx.clone())
            .with_refresh(Section::Devices, devices.refresh_handle())
            .with_refresh(Section::Rules, rules.refresh_handle())
            .with_refresh(Section::Maintenance, maintenance.refresh_handle())
            .with_refresh(Section::Notifications, notifications.refresh_handle());

        info!(?locale, "Service hub started");

        Self {
            locale,
            ops,
            devices,
            rules,
            maintenance,
            notifications,
            users,
            safety,
            tx,
            rx,
        }
    }

    /// Get the event receiver for the state layer
    ///
    /// Section updates and banners are multiplexed into this single channel.
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.rx.clone()
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        self.ops.gateway()
    }

    /// Validated mutations; success re-fetches the affected section
    pub fn operations(&self) -> &Operations {
        &self.ops
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    // ==================== Pollers ====================

    pub fn devices(&self) -> &Poller<Device> {
        &self.devices
    }

    pub fn rules(&self) -> &Poller<Rule> {
        &self.rules
    }

    pub fn maintenance(&self) -> &Poller<MaintenanceTask> {
        &self.maintenance
    }

    pub fn notifications(&self) -> &Poller<Notification> {
        &self.notifications
    }

    pub fn users(&self) -> &Poller<User> {
        &self.users
    }

    pub fn safety(&self) -> &Poller<SafetyPrecaution> {
        &self.safety
    }

    /// Request an immediate re-fetch of one section
    pub fn refresh(&self, section: Section) {
        debug!(%section, "Refresh requested");
        match section {
            Section::Devices => self.devices.refresh(),
            Section::Rules => self.rules.refresh(),
            Section::Maintenance => self.maintenance.refresh(),
            Section::Notifications => self.notifications.refresh(),
            Section::Users => self.users.refresh(),
            Section::Safety => self.safety.refresh(),
        }
    }

    pub fn refresh_all(&self) {
        for section in Section::ALL {
            self.refresh(section);
        }
    }

    /// Latest state of every section
    pub fn snapshot(&self) -> DashboardInputs {
        DashboardInputs {
            devices: self.devices.current(),
            rules: self.rules.current(),
            maintenance: self.maintenance.current(),
            notifications: self.notifications.current(),
            users: self.users.current(),
            safety: self.safety.current(),
        }
    }

    /// Stop all pollers; late responses are discarded
    pub fn stop(&self) {
        if self.devices.is_stopped() {
            return;
        }
        info!("Stopping all pollers");
        self.devices.stop();
        self.rules.stop();
        self.maintenance.stop();
        self.notifications.stop();
        self.users.stop();
        self.safety.stop();
        let _ = self.tx.send(ServiceEvent::Stopped);
    }

    /// Stop and wait for every poller task to exit
    pub async fn shutdown(&mut self) {
        self.stop();
        self.devices.shutdown().await;
        self.rules.shutdown().await;
        self.maintenance.shutdown().await;
        self.notifications.shutdown().await;
        self.users.shutdown().await;
        self.safety.shutdown().await;
    }

    // ==================== One-Shot ====================

    /// Fetch every section once, concurrently
    pub async fn fetch_once(gateway: &dyn Gateway, locale: Locale) -> DashboardInputs {
        let (devices, rules, maintenance, notifications, users, safety) = futures::join!(
            gateway.list_devices(),
            gateway.list_rules(),
            gateway.list_maintenance(),
            gateway.list_notifications(),
            gateway.list_users(),
            gateway.list_safety_precautions(),
        );

        DashboardInputs {
            devices: settle(Section::Devices, devices, locale),
            rules: settle(Section::Rules, rules, locale),
            maintenance: settle(Section::Maintenance, maintenance, locale),
            notifications: settle(Section::Notifications, notifications, locale),
            users: settle(Section::Users, users, locale),
            safety: settle(Section::Safety, safety, locale),
        }
    }
}

impl Drop for ServiceHub {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ServiceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("locale", &self.locale)
            .field("devices", &self.devices)
            .field("rules", &self.rules)
            .field("maintenance", &self.maintenance)
            .field("notifications", &self.notifications)
            .field("users", &self.users)
            .field("safety", &self.safety)
            .finish()
    }
}

/// Emit `SectionUpdated` whenever a poller applies a new result.
///
/// A failed poll also raises an error banner, once per distinct message;
/// a successful poll re-arms it. Ends when the poller task exits and drops
/// its sender.
fn forward<T: Send + Sync + 'static>(
    section: Section,
    locale: Locale,
    mut rx: watch::Receiver<SectionState<T>>,
    tx: Sender<ServiceEvent>,
) {
    let label = i18n::t(locale, section.label_key());
    tokio::spawn(async move {
        let mut seen = 0;
        let mut last_error: Option<String> = None;
        while rx.changed().await.is_ok() {
            let (generation, error) = {
                let state = rx.borrow_and_update();
                (state.generation, state.error.clone())
            };
            if generation == seen {
                continue;
            }
            seen = generation;

            if let Some(message) = &error {
                if last_error.as_ref() != Some(message) {
                    let banner =
                        ServiceEvent::Banner(BannerLevel::Error, format!("{label}: {message}"));
                    if tx.send(banner).is_err() {
                        break;
                    }
                }
            }
            last_error = error;

            if tx.send(ServiceEvent::SectionUpdated(section)).is_err() {
                break;
            }
        }
    });
}

fn settle<T>(section: Section, result: Result<Vec<T>>, locale: Locale) -> SectionState<T> {
    let mut state = SectionState::default();
    match result {
        Ok(data) => state.apply_data(data, Local::now()),
        Err(e) => {
            warn!(%section, error = %e, "Fetch failed");
            state.apply_error(i18n::error_message(locale, &e), Local::now());
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;
    use crate::services::MockGateway;

    fn idle_gateway() -> MockGateway {
        let mut mock = MockGateway::new();
        mock.expect_list_devices().returning(|| Ok(Vec::new()));
        mock.expect_list_rules().returning(|| Ok(Vec::new()));
        mock.expect_list_maintenance().returning(|| Ok(Vec::new()));
        mock.expect_list_notifications().returning(|| Ok(Vec::new()));
        mock.expect_list_users().returning(|| Ok(Vec::new()));
        mock.expect_list_safety_precautions().returning(|| Ok(Vec::new()));
        mock
    }

    fn drain_banners(rx: &Receiver<ServiceEvent>) -> Vec<(BannerLevel, String)> {
        rx.try_iter()
            .filter_map(|event| match event {
                ServiceEvent::Banner(level, message) => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_refetches_rules() {
        let mut mock = MockGateway::new();
        mock.expect_list_devices().returning(|| Ok(Vec::new()));
        mock.expect_list_maintenance().returning(|| Ok(Vec::new()));
        mock.expect_list_notifications().returning(|| Ok(Vec::new()));
        mock.expect_list_users().returning(|| Ok(Vec::new()));
        mock.expect_list_safety_precautions().returning(|| Ok(Vec::new()));
        mock.expect_list_rules().times(2).returning(|| {
            Ok(vec![Rule {
                id: "r-1".to_string(),
                ..Default::default()
            }])
        });
        mock.expect_toggle_rule()
            .withf(|id| id == "r-1")
            .times(1)
            .returning(|_| Ok(()));

        let hub = ServiceHub::spawn(Arc::new(mock), &PollingConfig::default(), Locale::EnUS);
        let events = hub.events();
        let mut rules = hub.rules().subscribe();
        rules.wait_for(|s| s.generation == 1).await.expect("initial fetch");

        hub.operations().toggle_rule("r-1").await.expect("toggle succeeds");
        rules.wait_for(|s| s.generation == 2).await.expect("refetch");

        let banners = drain_banners(&events);
        assert_eq!(
            banners,
            vec![(BannerLevel::Success, "Rules: Rule toggled".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_poll_raises_one_error_banner() {
        let mut mock = MockGateway::new();
        mock.expect_list_devices().returning(|| Ok(Vec::new()));
        mock.expect_list_maintenance().returning(|| Ok(Vec::new()));
        mock.expect_list_notifications().returning(|| Ok(Vec::new()));
        mock.expect_list_users().returning(|| Ok(Vec::new()));
        mock.expect_list_safety_precautions().returning(|| Ok(Vec::new()));
        mock.expect_list_rules().returning(|| {
            Err(Error::Network {
                message: "connection refused".to_string(),
            })
        });

        let hub = ServiceHub::spawn(Arc::new(mock), &PollingConfig::default(), Locale::EnUS);
        let events = hub.events();
        let mut rules = hub.rules().subscribe();
        rules.wait_for(|s| s.generation == 1).await.expect("first poll");
        tokio::time::sleep(Duration::from_millis(10)).await;

        let banners = drain_banners(&events);
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].0, BannerLevel::Error);
        assert!(banners[0].1.starts_with("Rules: Gateway unreachable"));

        // Same failure on the next tick stays quiet
        let interval = PollingConfig::interval(PollingConfig::default().rules);
        tokio::time::sleep(interval + Duration::from_secs(1)).await;
        rules.wait_for(|s| s.generation >= 2).await.expect("second poll");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(drain_banners(&events).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_section_updates_forwarded_and_stop() {
        let mock = idle_gateway();
        let mut hub = ServiceHub::spawn(Arc::new(mock), &PollingConfig::default(), Locale::EnUS);
        let events = hub.events();

        let mut safety = hub.safety().subscribe();
        safety.wait_for(|s| s.is_ready()).await.expect("first fetch");
        tokio::time::sleep(Duration::from_millis(10)).await;

        let updated: Vec<Section> = events
            .try_iter()
            .filter_map(|e| match e {
                ServiceEvent::SectionUpdated(section) => Some(section),
                _ => None,
            })
            .collect();
        assert!(updated.contains(&Section::Safety));

        hub.shutdown().await;
        assert!(hub.devices().is_stopped());
        assert!(events.try_iter().any(|e| e == ServiceEvent::Stopped));
    }

    #[tokio::test]
    async fn test_fetch_once_isolates_failures() {
        let mut mock = MockGateway::new();
        mock.expect_list_devices().returning(|| {
            Ok(vec![Device::default(), Device::default()])
        });
        mock.expect_list_rules().returning(|| {
            Err(Error::Network {
                message: "connection refused".to_string(),
            })
        });
        mock.expect_list_maintenance().returning(|| Ok(Vec::new()));
        mock.expect_list_notifications().returning(|| Ok(Vec::new()));
        mock.expect_list_users().returning(|| Ok(Vec::new()));
        mock.expect_list_safety_precautions().returning(|| Ok(Vec::new()));

        let inputs = ServiceHub::fetch_once(&mock, Locale::EnUS).await;
        assert_eq!(inputs.devices.len(), 2);
        assert!(inputs.rules.is_empty());
        let errors = inputs.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, Section::Rules);
        assert!(errors[0].1.starts_with("Gateway unreachable"));
    }
}
