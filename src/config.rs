//! Console configuration.

/// Console settings, owned by the [`Console`](crate::core::Console).
///
/// With the `persist` feature this can be loaded from and saved to a RON
/// file, see [`ConsoleConfig::load`](crate::persist).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "persist", serde(default))]
pub struct ConsoleConfig {
    /// Character separating tokens on an input line.
    pub delimiter: char,
    /// Mirror every history entry to the application log.
    pub log_history: bool,
    /// Register the built-in commands (`clear`, `quit`, `help`, ...).
    pub builtins: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            delimiter: ' ',
            log_history: true,
            builtins: true,
        }
    }
}

impl ConsoleConfig {
    /// Use a different token delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable mirroring history entries to the log.
    pub fn with_log_history(mut self, enabled: bool) -> Self {
        self.log_history = enabled;
        self
    }

    /// Enable or disable the built-in commands.
    pub fn with_builtins(mut self, enabled: bool) -> Self {
        self.builtins = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.delimiter, ' ');
        assert!(config.log_history);
        assert!(config.builtins);
    }

    #[test]
    fn test_builder() {
        let config = ConsoleConfig::default()
            .with_delimiter(',')
            .with_builtins(false);
        assert_eq!(config.delimiter, ',');
        assert!(!config.builtins);
    }
}
