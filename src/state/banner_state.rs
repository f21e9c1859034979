//! BannerState - Transient Success/Error Messages

use chrono::{DateTime, Local, TimeDelta};

use crate::constants::{BANNER_HISTORY_CAPACITY, ERROR_BANNER_SECS, SUCCESS_BANNER_SECS};
use crate::helpers::BoundedDeque;
use crate::services::BannerLevel;

/// A single banner
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: u64,
    pub level: BannerLevel,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

impl Banner {
    /// How long the banner stays up unless dismissed
    pub fn lifetime(level: BannerLevel) -> TimeDelta {
        match level {
            BannerLevel::Error => TimeDelta::seconds(ERROR_BANNER_SECS),
            BannerLevel::Success | BannerLevel::Info => TimeDelta::seconds(SUCCESS_BANNER_SECS),
        }
    }

    pub fn expires_at(&self) -> DateTime<Local> {
        self.raised_at + Self::lifetime(self.level)
    }
}

/// Visible banners, oldest first
#[derive(Debug)]
pub struct BannerState {
    banners: BoundedDeque<Banner>,
    next_id: u64,
}

impl BannerState {
    pub fn new(capacity: usize) -> Self {
        Self {
            banners: BoundedDeque::new(capacity),
            next_id: 1,
        }
    }

    /// Raise a banner, returning its id
    pub fn push(
        &mut self,
        level: BannerLevel,
        message: impl Into<String>,
        now: DateTime<Local>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.banners.push(Banner {
            id,
            level,
            message: message.into(),
            raised_at: now,
        });
        id
    }

    /// Manual dismissal; returns whether the banner was still visible
    pub fn dismiss(&mut self, id: u64) -> bool {
        self.banners.retain(|b| b.id != id) > 0
    }

    /// Dismiss the most recently raised banner still visible
    pub fn dismiss_latest(&mut self) -> Option<u64> {
        let id = self.banners.iter().last()?.id;
        self.dismiss(id);
        Some(id)
    }

    /// Drop banners whose lifetime has elapsed; returns how many went away
    pub fn expire(&mut self, now: DateTime<Local>) -> usize {
        self.banners.retain(|b| b.expires_at() > now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

impl Default for BannerState {
    fn default() -> Self {
        Self::new(BANNER_HISTORY_CAPACITY)
    }
}
