//! Archive configuration.

/// Default name of the archive worker thread.
pub const DEFAULT_THREAD_NAME: &str = "forest-archive";

/// Settings for an `Archive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Name given to the worker thread, visible in debuggers and logs.
    pub thread_name: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl ArchiveConfig {
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
