//! Runtime configuration for the engine.

/// Configuration for [`crate::engine::UsageEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base path to the proc pseudo-filesystem.
    pub proc_path: String,
    /// Network interface used by the device-less bandwidth queries.
    ///
    /// There is no built-in default: when unset, those queries fail with
    /// `MetricError::DeviceNotConfigured` instead of silently assuming an
    /// interface name.
    pub device: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proc_path: "/proc".to_string(),
            device: None,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network interface for the device-less bandwidth queries.
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Overrides the proc filesystem path (for testing/mocking).
    pub fn with_proc_path(mut self, proc_path: impl Into<String>) -> Self {
        self.proc_path = proc_path.into();
        self
    }
}
