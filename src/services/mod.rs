//! Service Layer
//!
//! The service layer talks to the platform gateway, polls every section on
//! its own timer and multiplexes section updates and banners into a single
//! event channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ServiceHub                              │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌──────────────┐   │
//! │  │ HttpGateway │◄─│ Poller × 6       │  │  Operations  │   │
//! │  │  (reqwest)  │  │ (watch channels) │  │ (+ refresh)  │   │
//! │  └─────────────┘  └──────────────────┘  └──────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ ServiceEvent
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      State Layer                             │
//! │                 (DashboardState, etc.)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod events;
mod gateway;
mod hub;
mod operations;
pub mod payload;
mod poller;

pub use events::*;
pub use gateway::*;
pub use hub::*;
pub use operations::*;
pub use payload::{DayWiseMaintenance, UpcomingMaintenance};
pub use poller::*;
