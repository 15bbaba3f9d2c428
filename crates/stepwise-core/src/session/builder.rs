//! Builder for creating and configuring Session instances.

use std::sync::Arc;

use super::Session;
use crate::{
    history::HISTORY_CAPACITY,
    store::{Clock, PlanStore, SystemClock},
};

/// Builder for creating and configuring Session instances.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    clock: Option<Arc<dyn Clock>>,
    history_capacity: usize,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            clock: None,
            history_capacity: HISTORY_CAPACITY,
        }
    }

    /// Sets the time source used to stamp plans.
    ///
    /// If not specified, uses the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets how many plan snapshots the undo history keeps.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Builds the configured session.
    pub fn build(self) -> Session {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        Session::new(PlanStore::with_history_capacity(
            clock,
            self.history_capacity,
        ))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
