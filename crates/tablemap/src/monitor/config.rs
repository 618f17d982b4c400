use std::time::Duration;

/// When a querier reports statements to its monitor.
///
/// Monitoring starts disabled: a querier with a monitor attached stays silent
/// until [`enable_monitoring`](Self::enable_monitoring) is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Statements running longer than this also trigger `on_slow_query`.
    pub slow_query_threshold: Option<Duration>,
    pub monitoring_enabled: bool,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.monitoring_enabled = true;
        self
    }

    pub fn disable_monitoring(mut self) -> Self {
        self.monitoring_enabled = false;
        self
    }

    /// Whether a statement that took `elapsed` counts as slow.
    pub fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_query_threshold
            .is_some_and(|threshold| elapsed > threshold)
    }
}
