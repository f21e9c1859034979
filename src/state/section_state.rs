//! SectionState - Latest Result of One Poller

use std::sync::Arc;

use chrono::{DateTime, Local};

/// Fallback when an error carries no text
const GENERIC_ERROR: &str = "Request failed";

/// `{data, loading, error}` for one section.
///
/// `data` is never absent: a failed fetch leaves it empty, not missing.
#[derive(Debug)]
pub struct SectionState<T> {
    pub data: Arc<Vec<T>>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped on every applied result, success or failure
    pub generation: u64,
    pub updated_at: Option<DateTime<Local>>,
}

impl<T> SectionState<T> {
    /// Initial state before the first fetch completes
    pub fn pending() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Replace the data atomically and clear any previous error
    pub fn apply_data(&mut self, data: Vec<T>, now: DateTime<Local>) {
        self.data = Arc::new(data);
        self.error = None;
        self.finish(now);
    }

    /// Record a failure: empty data, non-empty message
    pub fn apply_error(&mut self, message: impl Into<String>, now: DateTime<Local>) {
        let message = message.into();
        self.data = Arc::new(Vec::new());
        self.error = Some(if message.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            message
        });
        self.finish(now);
    }

    fn finish(&mut self, now: DateTime<Local>) {
        self.loading = false;
        self.generation += 1;
        self.updated_at = Some(now);
    }

    /// At least one result was applied
    pub fn is_ready(&self) -> bool {
        self.generation > 0
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        Self {
            data: Arc::new(Vec::new()),
            loading: false,
            error: None,
            generation: 0,
            updated_at: None,
        }
    }
}

// Manual impl: cloning shares the data, so `T: Clone` is not required.
impl<T> Clone for SectionState<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            loading: self.loading,
            error: self.error.clone(),
            generation: self.generation,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_clears_data() {
        let mut state = SectionState::pending();
        state.apply_data(vec![1, 2, 3], Local::now());
        assert_eq!(state.len(), 3);
        assert_eq!(state.generation, 1);

        state.apply_error("Gateway unreachable", Local::now());
        assert!(state.is_empty());
        assert_eq!(state.error.as_deref(), Some("Gateway unreachable"));
        assert!(!state.loading);
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn test_blank_error_gets_message() {
        let mut state: SectionState<u8> = SectionState::default();
        state.apply_error("  ", Local::now());
        assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR));
    }

    #[test]
    fn test_success_clears_error() {
        let mut state = SectionState::default();
        state.apply_error("boom", Local::now());
        state.apply_data(vec!["a"], Local::now());
        assert!(state.error.is_none());
        assert!(state.is_ready());
    }
}
