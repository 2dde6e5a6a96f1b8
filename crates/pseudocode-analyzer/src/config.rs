use std::fmt;

use serde::Deserialize;

use pseudocode_syntax::{DEFAULT_INDENT_WIDTH, MAX_INDENT_WIDTH};

use crate::scope::ScopeOrder;

/// Analyzer settings loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Open a scope for every nested control block, not just routine bodies
    pub block_scopes: bool,
    /// Listing order of the symbol table dump
    pub scope_order: ScopeOrder,
    /// Spaces per nesting level in the tree dump
    pub indent_width: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            block_scopes: false,
            scope_order: ScopeOrder::default(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Settings file that could not be used
#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    /// `indent_width` outside `1..=MAX_INDENT_WIDTH`
    IndentWidth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "{e}"),
            ConfigError::IndentWidth(width) => write!(
                f,
                "indent_width must be between 1 and {MAX_INDENT_WIDTH}, got {width}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::IndentWidth(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl AnalyzerConfig {
    /// Load settings from a TOML file
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&content)?;
        Ok(config)
    }

    /// Load settings from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_INDENT_WIDTH).contains(&self.indent_width) {
            return Err(ConfigError::IndentWidth(self.indent_width));
        }
        Ok(())
    }
}
