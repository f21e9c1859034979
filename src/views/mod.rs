//! Views - Plain-Text Presentation
//!
//! Stateless renderers over the aggregator's output and filtered lists.

pub mod dashboard;
pub mod lists;
mod table;

pub use table::*;
