//! State - Section, Banner and Dashboard State
//!
//! Split by update frequency: each poller owns one `SectionState`, banners
//! change on mutations and on the expiry tick, and the dashboard view is
//! derived from both.

mod banner_state;
mod dashboard_state;
mod section_state;

pub use banner_state::*;
pub use dashboard_state::*;
pub use section_state::*;
