//! Runtime configuration.

/// Configuration for a session orchestrator.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// How many recent non-system messages carry over on a hand-off
    /// (default: 6).
    pub keep_last_messages: usize,
    /// Broadcast channel capacity for observer fan-out (default: 1024).
    pub channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            keep_last_messages: 6,
            channel_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.keep_last_messages, 6);
        assert_eq!(config.channel_capacity, 1024);
    }
}
