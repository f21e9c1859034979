//! IoT Console Library
//!
//! Polling and aggregation layer for an IoT device-management platform:
//! a REST gateway client, per-section pollers, client-side analytics over
//! devices, rules and maintenance tasks, and a filter/sort list pipeline.

pub mod analytics;
pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;
