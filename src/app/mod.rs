//! Application Layer
//!
//! Command runners wiring configuration, the service hub, state and views.

pub mod application;

pub use application::{
    Action, ListRequest, MaintenanceView, run_action, run_list, run_snapshot, run_watch,
};
