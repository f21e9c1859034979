//! DashboardState - Inputs, Banners and the Memoized View
//!
//! Single owner of what the presentation layer reads. Section data arrives
//! as snapshots from the hub; banners arrive as service events and are
//! applied in batches.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};

use crate::analytics::{Aggregator, Collections, DashboardView, ViewKey};
use crate::domain::{Device, MaintenanceTask, Notification, Rule, SafetyPrecaution, User};
use crate::services::{Section, ServiceEvent};
use crate::state::{BannerState, SectionState};

/// Latest state of every section
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub devices: SectionState<Device>,
    pub rules: SectionState<Rule>,
    pub maintenance: SectionState<MaintenanceTask>,
    pub notifications: SectionState<Notification>,
    pub users: SectionState<User>,
    pub safety: SectionState<SafetyPrecaution>,
}

impl DashboardInputs {
    pub fn collections(&self) -> Collections<'_> {
        Collections {
            devices: &self.devices.data,
            rules: &self.rules.data,
            maintenance: &self.maintenance.data,
            notifications: &self.notifications.data,
            users: &self.users.data,
            safety: &self.safety.data,
        }
    }

    /// Generations in [`Section::ALL`] order
    pub fn generations(&self) -> [u64; 6] {
        [
            self.devices.generation,
            self.rules.generation,
            self.maintenance.generation,
            self.notifications.generation,
            self.users.generation,
            self.safety.generation,
        ]
    }

    /// `(section, message)` for every section currently in error
    pub fn errors(&self) -> Vec<(Section, &str)> {
        let errors = [
            self.devices.error.as_deref(),
            self.rules.error.as_deref(),
            self.maintenance.error.as_deref(),
            self.notifications.error.as_deref(),
            self.users.error.as_deref(),
            self.safety.error.as_deref(),
        ];
        Section::ALL
            .into_iter()
            .zip(errors)
            .filter_map(|(section, error)| error.map(|e| (section, e)))
            .collect()
    }

    /// Any section still waiting on its first result
    pub fn is_loading(&self) -> bool {
        self.devices.loading
            || self.rules.loading
            || self.maintenance.loading
            || self.notifications.loading
            || self.users.loading
            || self.safety.loading
    }
}

/// Dashboard state
#[derive(Debug)]
pub struct DashboardState {
    inputs: DashboardInputs,
    banners: BannerState,
    aggregator: Aggregator,
}

impl DashboardState {
    pub fn new(upcoming_limit: usize) -> Self {
        Self {
            inputs: DashboardInputs::default(),
            banners: BannerState::default(),
            aggregator: Aggregator::new(upcoming_limit),
        }
    }

    pub fn inputs(&self) -> &DashboardInputs {
        &self.inputs
    }

    pub fn banners(&self) -> &BannerState {
        &self.banners
    }

    pub fn banners_mut(&mut self) -> &mut BannerState {
        &mut self.banners
    }

    /// Replace the section snapshot
    pub fn set_inputs(&mut self, inputs: DashboardInputs) {
        self.inputs = inputs;
    }

    /// Apply a batch of service events; returns whether a re-render is due
    pub fn apply_batch(
        &mut self,
        batch: impl IntoIterator<Item = ServiceEvent>,
        now: DateTime<Local>,
    ) -> bool {
        let mut dirty = false;
        for event in batch {
            dirty |= self.apply_event(event, now);
        }
        dirty
    }

    fn apply_event(&mut self, event: ServiceEvent, now: DateTime<Local>) -> bool {
        match event {
            ServiceEvent::SectionUpdated(section) => {
                tracing::trace!(%section, "Section updated");
                true
            }
            ServiceEvent::Banner(level, message) => {
                self.banners.push(level, message, now);
                true
            }
            ServiceEvent::Stopped => false,
        }
    }

    /// Expire elapsed banners; returns whether any went away
    pub fn tick(&mut self, now: DateTime<Local>) -> bool {
        self.banners.expire(now) > 0
    }

    /// Memoized view for the current inputs
    pub fn view(&mut self, today: NaiveDate) -> Arc<DashboardView> {
        let key = ViewKey {
            generations: self.inputs.generations(),
            today,
        };
        self.aggregator.view(key, &self.inputs.collections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceStatus;
    use crate::services::BannerLevel;

    #[test]
    fn test_view_memoized_until_generation_changes() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date");
        let mut state = DashboardState::new(5);

        let mut inputs = DashboardInputs::default();
        inputs.devices.apply_data(
            vec![Device {
                status: DeviceStatus::Online,
                ..Default::default()
            }],
            Local::now(),
        );
        state.set_inputs(inputs.clone());

        let first = state.view(today);
        assert!(Arc::ptr_eq(&first, &state.view(today)));

        inputs.devices.apply_error("Gateway unreachable", Local::now());
        state.set_inputs(inputs);
        let second = state.view(today);
        assert_eq!(first.counts.total_devices, 1);
        assert_eq!(second.counts.total_devices, 0);
        assert_eq!(state.inputs().errors().len(), 1);
    }

    #[test]
    fn test_banner_events_applied() {
        let mut state = DashboardState::new(5);
        let now = Local::now();
        let dirty = state.apply_batch(
            [
                ServiceEvent::Banner(BannerLevel::Success, "Rules: Created".to_string()),
                ServiceEvent::Stopped,
            ],
            now,
        );
        assert!(dirty);
        assert_eq!(state.banners().len(), 1);
        assert!(state.tick(now + chrono::TimeDelta::seconds(6)));
        assert!(state.banners().is_empty());
    }
}
