//! Configuration for the compilation-database synchronizer.

use serde::{Deserialize, Serialize};

/// Configuration for the compilation-database synchronizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Program name or path of the external normalization tool.
    pub normalizer_program: String,

    /// Extra arguments passed to the tool ahead of the list-mode invocation.
    pub normalizer_args: Vec<String>,
}

impl SyncConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            normalizer_program: "compdb".to_string(),
            normalizer_args: Vec::new(),
        }
    }

    /// Set the normalization tool.
    pub fn with_normalizer_program(mut self, program: impl Into<String>) -> Self {
        self.normalizer_program = program.into();
        self
    }

    /// Add an extra normalizer argument.
    pub fn with_normalizer_arg(mut self, arg: impl Into<String>) -> Self {
        self.normalizer_args.push(arg.into());
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.normalizer_program, "compdb");
        assert!(config.normalizer_args.is_empty());
    }

    #[test]
    fn test_config_builders() {
        let config = SyncConfig::new()
            .with_normalizer_program("/usr/local/bin/compdb")
            .with_normalizer_arg("--verbose");

        assert_eq!(config.normalizer_program, "/usr/local/bin/compdb");
        assert_eq!(config.normalizer_args, vec!["--verbose".to_string()]);
    }
}
